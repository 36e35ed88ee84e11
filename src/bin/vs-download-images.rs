use anyhow::{Context, Result};
use clap::Parser;
use vs_migrate::{
    config::{self, ConfigArgs},
    download,
    report::Action,
    telemetry, util,
};

#[derive(Parser, Debug)]
#[command(about = "Download venue images into the local store, skipping existing files")]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();
    let args = Args::parse();
    telemetry::init_tracing("info")?;
    let settings = args.config.into_settings()?;
    let http = util::default_http_client()?;

    let summary = download::run(&settings, &http, &telemetry::progress_bar())
        .await
        .context("image download failed")?;
    println!(
        "{}",
        serde_json::json!({
            "expected": summary.expected(),
            "available": summary.available(),
            "downloaded": summary.images.count(Action::Downloaded),
            "already_present": summary.images.count(Action::AlreadyPresent),
            "failed": summary.images.failed(),
        })
    );
    Ok(())
}
