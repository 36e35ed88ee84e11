use anyhow::{Context, Result};
use clap::Parser;
use vs_migrate::{
    config::{self, ConfigArgs},
    export, telemetry, util,
};

#[derive(Parser, Debug)]
#[command(about = "Write the venue snapshot from the source listing")]
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

    let summary = export::run(&settings, &http, &telemetry::progress_bar())
        .await
        .context("export failed")?;
    println!(
        "{}",
        serde_json::json!({
            "snapshot": summary.snapshot.display().to_string(),
            "venues": summary.venues,
            "image_refs": summary.image_refs,
            "manual_coordinates": summary.manual_coordinates,
            "geocoded": summary.geocoded,
            "unresolved": summary.unresolved,
        })
    );
    Ok(())
}
