use indicatif::ProgressBar;
use reqwest::Client;
use tracing::{error, info, warn};

use crate::{
    api_interfaces::cms::DocId,
    cms::{CmsClient, CmsImage, CmsVenue, MediaUpload},
    config::{MimeTable, Settings},
    error::{ApiError, ImportError},
    report::{Action, BatchSummary, Outcome},
    store::ImageStore,
    throttle::Throttle,
    venue::{ImageRef, Snapshot, Venue},
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportSummary {
    pub venues: BatchSummary,
    pub images: BatchSummary,
    pub cache_purged: bool,
}

/// Upload images and upsert venues from the snapshot, one venue at a time.
pub async fn run(
    settings: &Settings,
    http: &Client,
    progress: &ProgressBar,
) -> Result<ImportSummary, ImportError> {
    let snapshot_path = settings.paths.snapshot();
    if !tokio::fs::try_exists(&snapshot_path).await.unwrap_or(false) {
        return Err(ImportError::SnapshotMissing(snapshot_path));
    }

    let cms = CmsClient::new(
        http.clone(),
        &settings.endpoints.cms,
        settings.cms_token.clone(),
    );
    info!(api = cms.base_url(), "testing API connection");
    cms.ping().await.map_err(ImportError::Unreachable)?;
    info!("API connection successful");

    let snapshot = Snapshot::load(&snapshot_path).await?;
    info!("found {} venues to import", snapshot.venues().len());

    let mut importer = Importer {
        cms,
        store: ImageStore::new(&settings.paths.images_dir),
        mime_types: &settings.mime_types,
        summary: ImportSummary::default(),
    };
    let mut throttle = Throttle::new(settings.rate_limit);
    let total = snapshot.venues().len();
    progress.set_length(total as u64);
    for (index, venue) in snapshot.venues().iter().enumerate() {
        throttle.ready().await;
        info!("[{}/{}] {}", index + 1, total, venue.title);
        let outcome = match importer.import_venue(venue).await {
            Ok((action, id)) => {
                info!(slug = %venue.slug, %id, "venue saved");
                Outcome::Succeeded(action)
            }
            Err(e) => Outcome::Failed(e.to_string()),
        };
        importer.summary.venues.record(venue.slug.clone(), outcome);
        progress.inc(1);
    }
    progress.finish();

    let mut summary = importer.summary;
    info!(
        "import completed: {} succeeded, {} failed",
        summary.venues.succeeded(),
        summary.venues.failed()
    );

    // The image store goes away even when venues failed; a rerun has to
    // download again.
    if !settings.keep_image_cache {
        match importer.store.purge().await {
            Ok(removed) => {
                summary.cache_purged = removed;
                if removed {
                    info!(dir = %importer.store.root().display(), "cleaned up image store");
                }
            }
            Err(e) => error!(
                dir = %importer.store.root().display(),
                error = %e,
                "unable to clean up image store"
            ),
        }
    }
    Ok(summary)
}

struct Importer<'a> {
    cms: CmsClient,
    store: ImageStore,
    mime_types: &'a MimeTable,
    summary: ImportSummary,
}

impl Importer<'_> {
    async fn import_venue(&mut self, venue: &Venue) -> Result<(Action, DocId), ApiError> {
        let mut images = Vec::with_capacity(venue.images.len());
        for image in &venue.images {
            let outcome = match self.upload_image(venue, image).await {
                Ok(id) => {
                    images.push(CmsImage {
                        kind: image.kind.cms_kind(),
                        image: id,
                    });
                    Outcome::Succeeded(Action::Uploaded)
                }
                Err(outcome) => outcome,
            };
            self.summary.images.record(image.filename.clone(), outcome);
        }

        let payload = CmsVenue::from_venue(venue, images);
        let existing = match self.cms.find_venue_by_slug(&venue.slug).await {
            Ok(doc) => doc.and_then(|doc| doc.doc_id().cloned()),
            Err(e) => {
                warn!(slug = %venue.slug, error = %e, "venue lookup failed, creating");
                None
            }
        };
        match existing {
            Some(id) => {
                info!(slug = %venue.slug, %id, "updating existing venue");
                let id = self.cms.update_venue(&id, &payload).await?;
                Ok((Action::Updated, id))
            }
            None => {
                info!(slug = %venue.slug, "creating new venue");
                let id = self.cms.create_venue(&payload).await?;
                Ok((Action::Created, id))
            }
        }
    }

    /// Upload one stored image. The error side carries the outcome to record.
    async fn upload_image(&self, venue: &Venue, image: &ImageRef) -> Result<DocId, Outcome> {
        if !self.store.contains(&image.filename).await {
            return Err(Outcome::Skipped(format!(
                "not found in {}",
                self.store.root().display()
            )));
        }
        let bytes = self
            .store
            .read(&image.filename)
            .await
            .map_err(|e| Outcome::Failed(format!("unable to read file: {e}")))?;
        let upload = MediaUpload {
            mime_type: self.mime_types.for_filename(&image.filename).to_string(),
            filename: image.filename.clone(),
            alt: format!("{} for {}", image.kind.as_str(), venue.title),
            bytes,
        };
        info!(
            file = %upload.filename,
            size = upload.bytes.len(),
            mime = %upload.mime_type,
            "uploading"
        );
        self.cms
            .upload_media(upload)
            .await
            .map_err(|e| Outcome::Failed(e.to_string()))
    }
}
