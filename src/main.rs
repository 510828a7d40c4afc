// Blink an LED on one GPIO line through the Linux GPIO character device
mod blink;
mod cdev;
mod config;
mod error;
#[cfg(test)]
mod fake_gpio;
mod gpio;

use eyre::{Result, WrapErr};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::blink::BlinkController;
use crate::cdev::Cdev;
use crate::config::BlinkConfig;

use git_version::git_version;
const GIT_VERSION: &str = git_version!(fallback = "unknown");

/// Resolves on Ctrl+C or SIGTERM. If no handler can be installed the blink
/// loop keeps running until the process is killed.
async fn shutdown_signal() {
    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(s) => Some(s),
        Err(e) => {
            error!("Unable to listen for SIGTERM: {}", e);
            None
        }
    };
    let sigterm = async {
        match terminate.as_mut() {
            Some(s) => {
                s.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    };
    tokio::select! {
        res = tokio::signal::ctrl_c() => match res {
            Ok(()) => info!("Received shutdown signal (Ctrl+C)"),
            Err(e) => {
                error!("Unable to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await
            }
        },
        _ = sigterm => info!("Received shutdown signal (SIGTERM)"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber).wrap_err("setting default subscriber failed")?;
    info!("Starting blinky version {}", GIT_VERSION);

    let config = BlinkConfig::default();
    info!(
        "Blinking line {} on {} at {} Hz",
        config.line_offset,
        config.chip_path().display(),
        config.frequency_hz
    );
    let mut controller = BlinkController::open(&Cdev, config)?;

    let outcome = controller.run(shutdown_signal()).await;
    info!(
        "Line {} left at {} after {} toggles",
        controller.config().line_offset,
        controller.level(),
        controller.toggles()
    );
    controller.close();
    outcome?;

    info!("Program terminated");
    Ok(())
}
