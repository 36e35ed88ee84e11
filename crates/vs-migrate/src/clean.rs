use reqwest::Client;
use tracing::{info, warn};

use crate::{
    cms::{CmsClient, Collection},
    config::Settings,
    constants::CMS_LIST_LIMIT,
    report::{Action, BatchSummary, Outcome},
    store::remove_dir_if_present,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CleanSummary {
    pub local: BatchSummary,
    /// `None` when the CMS could not be reached and its cleanup was skipped.
    pub cms: Option<CmsCleanup>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CmsCleanup {
    pub venues: BatchSummary,
    pub media: BatchSummary,
}

/// Best-effort reset: local directories first, then every venue and media
/// document in the CMS. Nothing here is fatal.
pub async fn run(settings: &Settings, http: &Client) -> CleanSummary {
    let mut summary = CleanSummary::default();
    for dir in [&settings.paths.images_dir, &settings.paths.output_dir] {
        let outcome = match remove_dir_if_present(dir).await {
            Ok(true) => Outcome::Succeeded(Action::Deleted),
            Ok(false) => Outcome::Skipped("directory not found".to_string()),
            Err(e) => Outcome::Failed(e.to_string()),
        };
        summary.local.record(dir.display().to_string(), outcome);
    }

    let cms = CmsClient::new(
        http.clone(),
        &settings.endpoints.cms,
        settings.cms_token.clone(),
    );
    info!(api = cms.base_url(), "testing API connection");
    if let Err(e) = cms.ping().await {
        warn!(error = %e, "unable to reach the CMS API, skipping CMS cleanup");
        return summary;
    }

    let venues = delete_all(&cms, Collection::Venues).await;
    let media = delete_all(&cms, Collection::Media).await;
    summary.cms = Some(CmsCleanup { venues, media });
    info!("cleanup completed");
    summary
}

async fn delete_all(cms: &CmsClient, collection: Collection) -> BatchSummary {
    let mut summary = BatchSummary::default();
    let docs = match cms.list(collection, CMS_LIST_LIMIT).await {
        Ok(docs) => docs,
        Err(e) => {
            summary.record(
                format!("list {}", collection.path()),
                Outcome::Failed(e.to_string()),
            );
            return summary;
        }
    };
    if docs.is_empty() {
        info!(collection = collection.path(), "nothing to delete");
        return summary;
    }
    info!(collection = collection.path(), "deleting {} documents", docs.len());
    for doc in docs {
        let outcome = match doc.doc_id() {
            Some(id) => match cms.delete(collection, id).await {
                Ok(()) => Outcome::Succeeded(Action::Deleted),
                Err(e) => Outcome::Failed(e.to_string()),
            },
            None => Outcome::Skipped("document has no id".to_string()),
        };
        summary.record(doc.label(), outcome);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Endpoints, Paths, SettingsBuilder};
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn settings(cms: String, dir: &TempDir) -> Settings {
        SettingsBuilder::default()
            .endpoints(Endpoints {
                cms,
                ..Endpoints::default()
            })
            .paths(Paths {
                images_dir: dir.path().join("temp_images"),
                output_dir: dir.path().join("output"),
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn unreachable_api_still_cleans_local_state() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let settings = settings("http://127.0.0.1:9/api".to_string(), &dir);
        std::fs::create_dir_all(&settings.paths.images_dir).unwrap();
        std::fs::write(settings.paths.images_dir.join("york-map.jpg"), "x").unwrap();
        std::fs::create_dir_all(&settings.paths.output_dir).unwrap();

        // Act
        let summary = run(&settings, &reqwest::Client::new()).await;

        // Assert
        assert!(!settings.paths.images_dir.exists());
        assert!(!settings.paths.output_dir.exists());
        assert_eq!(summary.local.count(Action::Deleted), 2);
        assert!(summary.cms.is_none());
    }

    #[tokio::test]
    async fn deletes_every_document_and_tolerates_failures() {
        // Arrange
        let server = MockServer::start_async().await;
        let dir = TempDir::new().unwrap();
        let settings = settings(server.url("/api"), &dir);
        let ping_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/venues").query_param("limit", "1");
                then.status(200).json_body(json!({ "docs": [] }));
            })
            .await;
        let venues_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/venues")
                    .query_param("limit", "1000");
                then.status(200).json_body(json!({
                    "docs": [
                        { "id": "v1", "title": "York" },
                        { "id": "v2", "title": "Bath" }
                    ]
                }));
            })
            .await;
        let media_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/media").query_param("limit", "1000");
                then.status(200)
                    .json_body(json!({ "docs": [{ "id": 10, "filename": "york-map.jpg" }] }));
            })
            .await;
        let delete_v1 = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/venues/v1");
                then.status(200).json_body(json!({}));
            })
            .await;
        let delete_v2 = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/venues/v2");
                then.status(500).body("locked");
            })
            .await;
        let delete_media = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/media/10");
                then.status(200).json_body(json!({}));
            })
            .await;

        // Act
        let summary = run(&settings, &reqwest::Client::new()).await;

        // Assert
        let cms = summary.cms.expect("CMS cleanup should run");
        assert_eq!(cms.venues.count(Action::Deleted), 1);
        assert_eq!(cms.venues.failed(), 1);
        assert!(matches!(cms.venues.outcome_of("Bath"), Some(Outcome::Failed(_))));
        assert_eq!(cms.media.count(Action::Deleted), 1);
        assert_eq!(summary.local.skipped(), 2);
        ping_mock.assert();
        venues_mock.assert();
        media_mock.assert();
        delete_v1.assert();
        delete_v2.assert();
        delete_media.assert();
    }
}
