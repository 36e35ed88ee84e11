use anyhow::Result;
use clap::Parser;
use vs_migrate::{
    clean,
    config::{self, ConfigArgs},
    report::Action,
    telemetry, util,
};

#[derive(Parser, Debug)]
#[command(about = "Remove local output and every CMS venue and media document")]
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

    let summary = clean::run(&settings, &http).await;
    let cms = summary.cms.as_ref().map(|cms| {
        serde_json::json!({
            "venues_deleted": cms.venues.count(Action::Deleted),
            "media_deleted": cms.media.count(Action::Deleted),
            "failed": cms.venues.failed() + cms.media.failed(),
        })
    });
    println!(
        "{}",
        serde_json::json!({
            "local_removed": summary.local.count(Action::Deleted),
            "cms": cms,
        })
    );
    Ok(())
}
