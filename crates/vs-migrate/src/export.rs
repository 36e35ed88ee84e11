use std::path::PathBuf;

use indicatif::ProgressBar;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    config::Settings,
    error::ExportError,
    geocode::{CoordinateResolver, CoordinateSource, Geocoder, Unresolved},
    source::SourceVenues,
    store::remove_dir_if_present,
    venue::Snapshot,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportSummary {
    pub snapshot: PathBuf,
    pub venues: usize,
    pub image_refs: usize,
    pub manual_coordinates: usize,
    pub geocoded: usize,
    pub unresolved: usize,
}

/// Pull the venue listing, resolve coordinates and write the snapshot.
///
/// A failed listing aborts before anything on disk is touched. Geocoding
/// failures only leave that venue without coordinates.
pub async fn run(
    settings: &Settings,
    http: &Client,
    progress: &ProgressBar,
) -> Result<ExportSummary, ExportError> {
    info!(source = %settings.endpoints.source, "fetching venues");
    let source = SourceVenues::fetch(http, &settings.endpoints.source)
        .await
        .map_err(ExportError::Source)?;
    info!("found {} venues", source.len());

    let geocoder = Geocoder::from_endpoints(
        http.clone(),
        &settings.endpoints,
        settings.geocode_key.as_ref(),
    );
    let resolver = CoordinateResolver::new(settings.manual_coords.clone(), geocoder);
    if !resolver.has_geocoder() {
        warn!("no geocoding key configured; venues outside the manual table get null coordinates");
    }

    let mut summary = ExportSummary {
        snapshot: settings.paths.snapshot(),
        ..ExportSummary::default()
    };
    let total = source.len();
    progress.set_length(total as u64);
    let mut venues = Vec::with_capacity(total);
    for (index, raw) in source.iter().enumerate() {
        info!("[{}/{}] {}", index + 1, total, raw.title());
        let resolution = resolver.resolve(raw.slug(), raw.address()).await;
        match &resolution.source {
            CoordinateSource::Manual => summary.manual_coordinates += 1,
            CoordinateSource::Geocoded => summary.geocoded += 1,
            CoordinateSource::Unresolved(reason) => {
                summary.unresolved += 1;
                match reason {
                    Unresolved::NoAddress | Unresolved::GeocodingDisabled => {
                        info!(slug = raw.slug(), %reason, "no coordinates")
                    }
                    Unresolved::BadAnswer(_) => {
                        debug!(slug = raw.slug(), %reason, "unusable geocoding answer")
                    }
                    Unresolved::RequestFailed(_) => {
                        warn!(slug = raw.slug(), %reason, "geocoding failed")
                    }
                }
            }
        }
        venues.push(raw.to_venue(resolution.coordinates));
        progress.inc(1);
    }
    let snapshot = Snapshot(venues);
    summary.venues = snapshot.venues().len();
    summary.image_refs = snapshot.image_count();

    let output_dir = &settings.paths.output_dir;
    remove_dir_if_present(output_dir)
        .await
        .map_err(|e| ExportError::OutputDir(output_dir.clone(), e))?;
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| ExportError::OutputDir(output_dir.clone(), e))?;
    snapshot.save(&summary.snapshot).await?;
    progress.finish();

    info!(
        path = %summary.snapshot.display(),
        "export completed: {} venues, {} image references",
        summary.venues,
        summary.image_refs
    );
    Ok(summary)
}
