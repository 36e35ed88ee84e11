use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use vs_migrate::{
    clean,
    config::{self, ConfigArgs, Settings},
    download, export, import, telemetry, util,
};

#[derive(Parser, Debug)]
#[command(about = "Move venues from the legacy WordPress site into the CMS")]
struct CliArgs {
    #[command(subcommand)]
    pub subcommand: Command,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    #[clap(name = "export", about = "Write the venue snapshot from the source listing")]
    Export,

    #[clap(name = "download-images", about = "Download venue images into the local store")]
    DownloadImages,

    #[clap(name = "import", about = "Upload images and upsert venues into the CMS")]
    Import {
        #[arg(long, help = "Keep the local image store after importing")]
        keep_images: bool,
    },

    #[clap(name = "clean", about = "Remove local output and every CMS venue and media document")]
    Clean,

    #[clap(name = "sync", about = "Run export, download-images and import in sequence")]
    Sync {
        #[arg(long, help = "Keep the local image store after importing")]
        keep_images: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();
    let args = CliArgs::parse();
    telemetry::init_tracing("info")?;
    let mut settings = args.config.into_settings()?;
    let http = util::default_http_client()?;

    match args.subcommand {
        Command::Export => run_export(&settings, &http).await?,
        Command::DownloadImages => run_download(&settings, &http).await?,
        Command::Import { keep_images } => {
            settings.keep_image_cache = keep_images;
            run_import(&settings, &http).await?;
        }
        Command::Clean => {
            clean::run(&settings, &http).await;
        }
        Command::Sync { keep_images } => {
            settings.keep_image_cache = keep_images;
            run_export(&settings, &http).await?;
            run_download(&settings, &http).await?;
            run_import(&settings, &http).await?;
        }
    }

    Ok(())
}

async fn run_export(settings: &Settings, http: &reqwest::Client) -> Result<()> {
    export::run(settings, http, &telemetry::progress_bar())
        .await
        .context("export failed")?;
    Ok(())
}

async fn run_download(settings: &Settings, http: &reqwest::Client) -> Result<()> {
    download::run(settings, http, &telemetry::progress_bar())
        .await
        .context("image download failed")?;
    Ok(())
}

async fn run_import(settings: &Settings, http: &reqwest::Client) -> Result<()> {
    let summary = import::run(settings, http, &telemetry::progress_bar())
        .await
        .context("import failed")?;
    info!(
        "images: {} uploaded, {} skipped, {} failed",
        summary.images.succeeded(),
        summary.images.skipped(),
        summary.images.failed()
    );
    Ok(())
}
