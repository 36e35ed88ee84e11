use indicatif::ProgressBar;
use reqwest::Client;
use tracing::info;

use crate::{
    config::Settings,
    error::{ApiError, DownloadError},
    report::{Action, BatchSummary, Outcome},
    source::SourceVenues,
    store::ImageStore,
    throttle::Throttle,
    venue::ImageRef,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DownloadSummary {
    pub images: BatchSummary,
}

impl DownloadSummary {
    /// Images referenced by the listing.
    pub fn expected(&self) -> usize {
        self.images.total()
    }

    /// Images present in the store after the run, fresh or cached.
    pub fn available(&self) -> usize {
        self.images.succeeded()
    }
}

/// Fill the image store from the source listing, skipping files already present.
pub async fn run(
    settings: &Settings,
    http: &Client,
    progress: &ProgressBar,
) -> Result<DownloadSummary, DownloadError> {
    let source = SourceVenues::fetch(http, &settings.endpoints.source)
        .await
        .map_err(DownloadError::Source)?;
    info!("found {} venues", source.len());

    let store = ImageStore::new(&settings.paths.images_dir);
    store
        .ensure()
        .await
        .map_err(|e| DownloadError::Store(store.root().to_path_buf(), e))?;

    let mut summary = DownloadSummary::default();
    let mut throttle = Throttle::new(settings.rate_limit);
    let total = source.len();
    progress.set_length(total as u64);
    for (index, venue) in source.iter().enumerate() {
        throttle.ready().await;
        info!("[{}/{}] {}", index + 1, total, venue.title());
        for image in venue.image_refs() {
            let outcome = fetch_into(http, &store, &image).await;
            summary.images.record(image.filename, outcome);
        }
        progress.inc(1);
    }
    progress.finish();

    info!(
        dir = %store.root().display(),
        "download completed: {}/{} images",
        summary.available(),
        summary.expected()
    );
    Ok(summary)
}

async fn fetch_into(http: &Client, store: &ImageStore, image: &ImageRef) -> Outcome {
    if store.contains(&image.filename).await {
        return Outcome::Succeeded(Action::AlreadyPresent);
    }
    let bytes = match fetch_image(http, &image.original_url).await {
        Ok(bytes) => bytes,
        Err(e) => return Outcome::Failed(e.to_string()),
    };
    match store.write(&image.filename, &bytes).await {
        Ok(_) => Outcome::Succeeded(Action::Downloaded),
        Err(e) => Outcome::Failed(format!("unable to write file: {e}")),
    }
}

async fn fetch_image(http: &Client, url: &str) -> Result<Vec<u8>, ApiError> {
    let response = http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::ResponseError(status, String::new()));
    }
    let bytes = response.bytes().await.map_err(ApiError::ResponseBodyError)?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Endpoints, Paths, SettingsBuilder},
        source::tests::wp_venue,
        throttle::RateLimit,
    };
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn settings(server: &MockServer, dir: &TempDir) -> Settings {
        SettingsBuilder::default()
            .endpoints(Endpoints {
                source: server.url("/wp-json/wp/v2/venue"),
                ..Endpoints::default()
            })
            .paths(Paths {
                images_dir: dir.path().join("temp_images"),
                output_dir: dir.path().join("output"),
            })
            .rate_limit(RateLimit::unlimited())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn downloads_and_counts_failures() {
        // Arrange
        let server = MockServer::start_async().await;
        let image_base = server.url("/img");
        let source_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/wp-json/wp/v2/venue");
                then.status(200).json_body(json!([wp_venue(1, "york", &image_base)]));
            })
            .await;
        let logo_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/img/york/logo.png");
                then.status(200).body("logo-bytes");
            })
            .await;
        let hero_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/img/york/hero-1.jpg");
                then.status(200).body("hero-bytes");
            })
            .await;
        let map_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/img/york/map.jpg");
                then.status(404);
            })
            .await;
        let dir = TempDir::new().unwrap();
        let settings = settings(&server, &dir);

        // Act
        let summary = run(&settings, &reqwest::Client::new(), &ProgressBar::hidden())
            .await
            .unwrap();

        // Assert
        assert_eq!(summary.expected(), 3);
        assert_eq!(summary.available(), 2);
        assert_eq!(summary.images.failed(), 1);
        assert!(matches!(
            summary.images.outcome_of("york-map.jpg"),
            Some(Outcome::Failed(_))
        ));
        let stored = std::fs::read(settings.paths.images_dir.join("york-hero-logo.jpg")).unwrap();
        assert_eq!(stored, b"logo-bytes");
        source_mock.assert();
        logo_mock.assert();
        hero_mock.assert();
        map_mock.assert();
    }

    #[tokio::test]
    async fn populated_store_makes_no_image_requests() {
        // Arrange
        let server = MockServer::start_async().await;
        let image_base = server.url("/img");
        let source_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/wp-json/wp/v2/venue");
                then.status(200).json_body(json!([
                    wp_venue(1, "york", &image_base),
                    wp_venue(2, "bath", &image_base)
                ]));
            })
            .await;
        let image_mock = server
            .mock_async(|when, then| {
                when.method(GET).path_contains("/img/");
                then.status(200).body("bytes");
            })
            .await;
        let dir = TempDir::new().unwrap();
        let settings = settings(&server, &dir);
        std::fs::create_dir_all(&settings.paths.images_dir).unwrap();
        for slug in ["york", "bath"] {
            for suffix in ["hero-logo", "hero-image", "map"] {
                let path = settings.paths.images_dir.join(format!("{slug}-{suffix}.jpg"));
                std::fs::write(path, "cached").unwrap();
            }
        }

        // Act
        let summary = run(&settings, &reqwest::Client::new(), &ProgressBar::hidden())
            .await
            .unwrap();

        // Assert
        assert_eq!(summary.expected(), 6);
        assert_eq!(summary.images.count(Action::AlreadyPresent), 6);
        source_mock.assert();
        image_mock.assert_hits(0);
    }

    #[tokio::test]
    async fn source_failure_is_fatal() {
        // Arrange
        let server = MockServer::start_async().await;
        let source_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/wp-json/wp/v2/venue");
                then.status(502);
            })
            .await;
        let dir = TempDir::new().unwrap();

        // Act
        let result = run(
            &settings(&server, &dir),
            &reqwest::Client::new(),
            &ProgressBar::hidden(),
        )
        .await;

        // Assert
        assert!(matches!(result.unwrap_err(), DownloadError::Source(_)));
        source_mock.assert();
    }
}
