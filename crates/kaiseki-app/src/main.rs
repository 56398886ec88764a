use std::fs;

use anyhow::Context;
use kaiseki_capture::{KeyBinding, KeyboardInput, RegionCapturer, XcapGrabber};
use kaiseki_config::Config;
use kaiseki_io::Journal;
use kaiseki_types::Control;
use kaiseki_vision::{ChatCompletionClient, VisionQuery};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use self::controller::{ExitReason, LoopTiming, Pipeline, input_loop};

pub mod controller;
mod logging;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    logging::init_tracing();
    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) => tracing::debug!("No .env loaded: {e}"),
    }

    let config = Config::from_env().context("Invalid configuration")?;
    tracing::debug!("{config:?}");

    let capture_keys =
        KeyBinding::parse(&config.input.capture_keys).context("Invalid CAPTURE_KEYS")?;
    let exit_keys = KeyBinding::parse(&config.input.exit_keys).context("Invalid EXIT_KEYS")?;
    let input =
        KeyboardInput::new(capture_keys, exit_keys).context("Failed to access the keyboard")?;

    fs::create_dir_all(&config.storage.screenshot_dir).with_context(|| {
        format!(
            "Failed to create {}",
            config.storage.screenshot_dir.display()
        )
    })?;

    let vision = ChatCompletionClient::new(&config.vision).context("Failed to build HTTP client")?;
    let metadata = vision.metadata();
    tracing::info!("Using model {} at {}", metadata.model, metadata.endpoint);

    let pipeline = Pipeline::new(
        RegionCapturer::new(
            Box::new(XcapGrabber),
            config.capture.region,
            config.storage.screenshot_dir.clone(),
        ),
        Box::new(vision),
        Journal::new(config.storage.log_dir.clone()),
    );

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        }
    });

    println!(
        "Press {} to capture {} and analyse the Japanese in it (press {} to quit)",
        input.binding(Control::Capture),
        config.capture.region,
        input.binding(Control::Exit)
    );

    let summary = input_loop(&pipeline, &input, LoopTiming::from(&config.input), cancel).await?;

    match summary.reason {
        ExitReason::ExitKey => tracing::info!("Exit key pressed"),
        ExitReason::Interrupted => tracing::info!("Interrupted"),
    }
    tracing::info!(
        "{} capture cycles, {} rejected by the endpoint",
        summary.cycles,
        summary.rejected
    );

    Ok(())
}
