use anyhow::{Context, Result};
use clap::Parser;
use vs_migrate::{
    config::{self, ConfigArgs},
    import,
    report::Action,
    telemetry, util,
};

#[derive(Parser, Debug)]
#[command(about = "Upload images and upsert venues from the snapshot into the CMS")]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    #[arg(long, help = "Keep the local image store after importing")]
    keep_images: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();
    let args = Args::parse();
    telemetry::init_tracing("info")?;
    let mut settings = args.config.into_settings()?;
    settings.keep_image_cache = args.keep_images;
    let http = util::default_http_client()?;

    let summary = import::run(&settings, &http, &telemetry::progress_bar())
        .await
        .context("import failed")?;
    println!(
        "{}",
        serde_json::json!({
            "created": summary.venues.count(Action::Created),
            "updated": summary.venues.count(Action::Updated),
            "failed": summary.venues.failed(),
            "images_uploaded": summary.images.count(Action::Uploaded),
            "images_skipped": summary.images.skipped(),
            "images_failed": summary.images.failed(),
            "cache_purged": summary.cache_purged,
        })
    );
    Ok(())
}
