use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use kaiseki_capture::{InputSource, RegionCapturer};
use kaiseki_config::input::InputConfig;
use kaiseki_io::Journal;
use kaiseki_types::{Control, LogRecord};
use kaiseki_vision::VisionQuery;
use tokio_util::sync::CancellationToken;

/// Everything one capture cycle runs through
pub struct Pipeline {
    capturer: RegionCapturer,
    vision: Box<dyn VisionQuery>,
    journal: Journal,
}

/// Outcome of one capture cycle
#[derive(Debug)]
pub struct CycleReport {
    pub screenshot: PathBuf,
    pub log_file: PathBuf,
    pub answered: bool,
}

impl Pipeline {
    pub fn new(capturer: RegionCapturer, vision: Box<dyn VisionQuery>, journal: Journal) -> Self {
        Self {
            capturer,
            vision,
            journal,
        }
    }

    /// Capture, query, log. Rejections are logged like answers, anything else is fatal.
    pub async fn run_cycle(&self) -> anyhow::Result<CycleReport> {
        println!("\n[capture] Grabbing {} and sending request...", self.capturer.region());

        let capture = self
            .capturer
            .capture(Local::now())
            .context("Failed to capture screen region")?;
        tracing::info!("Captured {}", capture.path.display());

        let result = self
            .vision
            .query(&capture.image_b64)
            .await
            .context("Vision request failed")?;
        let text = result.text();

        println!("\n=== Result ===\n{text}");

        let log_file = self
            .journal
            .append(&LogRecord {
                timestamp: Local::now(),
                screenshot: capture.path.clone(),
                body: text,
            })
            .with_context(|| format!("Failed to write log in {}", self.journal.dir().display()))?;

        Ok(CycleReport {
            screenshot: capture.path,
            log_file,
            answered: result.is_answer(),
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LoopTiming {
    pub poll_interval: Duration,
    pub debounce: Duration,
}

impl From<&InputConfig> for LoopTiming {
    fn from(config: &InputConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            debounce: Duration::from_millis(config.debounce_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Capturing,
    Exiting,
}

impl LoopState {
    /// Capture wins when both controls are held
    pub fn observe(input: &dyn InputSource) -> Self {
        if input.is_active(Control::Capture) {
            LoopState::Capturing
        } else if input.is_active(Control::Exit) {
            LoopState::Exiting
        } else {
            LoopState::Idle
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    ExitKey,
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub cycles: u64,
    pub rejected: u64,
    pub reason: ExitReason,
}

/// Poll the input until the exit control or `cancel`
///
/// A cycle always runs to completion; presses during it are not queued.
pub async fn input_loop(
    pipeline: &Pipeline,
    input: &dyn InputSource,
    timing: LoopTiming,
    cancel: CancellationToken,
) -> anyhow::Result<LoopSummary> {
    let mut cycles = 0;
    let mut rejected = 0;

    let reason = loop {
        if cancel.is_cancelled() {
            break ExitReason::Interrupted;
        }

        match LoopState::observe(input) {
            LoopState::Capturing => {
                let report = pipeline.run_cycle().await?;
                cycles += 1;
                if !report.answered {
                    rejected += 1;
                }
                tracing::info!(
                    "Cycle {}: {} logged to {}",
                    cycles,
                    report.screenshot.display(),
                    report.log_file.display()
                );

                tokio::select! {
                    _ = tokio::time::sleep(timing.debounce) => {}
                    _ = cancel.cancelled() => {
                        tracing::info!("Input loop shutting down");
                        break ExitReason::Interrupted;
                    }
                }
            }
            LoopState::Exiting => {
                println!("Exiting");
                break ExitReason::ExitKey;
            }
            LoopState::Idle => {}
        }

        tokio::select! {
            _ = tokio::time::sleep(timing.poll_interval) => {}
            _ = cancel.cancelled() => {
                tracing::info!("Input loop shutting down");
                break ExitReason::Interrupted;
            }
        }
    };

    Ok(LoopSummary {
        cycles,
        rejected,
        reason,
    })
}
