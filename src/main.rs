use anyhow::Result;
use std::io::Read;

use skycast_advisor::{build_client, BriefingGenerator, Orchestrator};
use skycast_core::{AppError, Config};
use skycast_weather::WeatherSnapshot;

/// Parse the current-weather document from `path`, or stdin when absent.
fn read_snapshot(path: Option<String>) -> Result<WeatherSnapshot, AppError> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    serde_json::from_str(&raw).map_err(|e| {
        AppError::Other(anyhow::Error::new(e).context("Failed to parse weather snapshot"))
    })
}

/// Reads a current-weather JSON document (file argument or stdin) and prints
/// the briefing and recommendations for it.
#[tokio::main]
async fn main() -> Result<()> {
    skycast_core::init()?;

    let (config, _validation) = Config::load_validated().inspect_err(|e| {
        tracing::error!("{}", e.user_message());
    })?;
    tracing::info!("Config directory: {}", config.config_dir.display());

    let weather = read_snapshot(std::env::args().nth(1)).inspect_err(|e| {
        tracing::error!("{}", e.user_message());
    })?;

    let client = build_client(config.http.request_timeout())?;

    let briefing = BriefingGenerator::from_client(client.clone(), &config);
    match briefing.generate(&weather.name, &weather).await {
        Ok(b) => {
            println!("{}\n", b.text);
            for tip in &b.tips {
                println!("Tip: {}", tip);
            }
            println!();
        }
        Err(e) => tracing::warn!("{}", e.user_message()),
    }

    let orchestrator = Orchestrator::from_client(client, &config);
    println!("{}", orchestrator.get_recommendations(&weather).await);

    Ok(())
}
