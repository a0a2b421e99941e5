//! # Load Simulation
//!
//! Drives many concurrent synthetic clients against a [`Backend`] and
//! aggregates what they observe.
//!
//! ## Structure
//!
//! - [`controller`] - owns the backend and the clients, collects metrics
//! - [`client_actor`] - one synthetic user performing random actions
//! - [`metrics`] - per-action latency and error aggregation
//! - [`zipf`] - skewed engine assignment
//!
//! ```rust,ignore
//! let report = simulation::run(SimulationConfig { clients: 50, ..Default::default() }).await?;
//! println!("{report}");
//! ```

pub mod client_actor;
pub mod controller;
pub mod metrics;
pub mod zipf;

pub use client_actor::*;
pub use controller::*;
pub use metrics::*;
pub use zipf::*;

use crate::config::{ConfigError, SimulationConfig};
use crate::lifecycle::Backend;
use actor_runtime::{spawn, RuntimeError};
use rand::distributions::WeightedError;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Upper bound on how long the controller may take to wind everything down.
const FINISH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid engine distribution: {0}")]
    Distribution(#[from] WeightedError),

    #[error("controller failed: {0}")]
    Controller(#[from] RuntimeError),
}

/// Runs one simulation to completion and returns its final report.
pub async fn run(config: SimulationConfig) -> Result<MetricsReport, SimulationError> {
    config.validate()?;
    let backend = Backend::start(config.backend.clone(), config.engines)?;
    let controller = SimulationController::new(config.clone(), backend)?;
    let (addr, handle) = spawn(controller);
    info!(duration = ?config.duration(), "Simulation running");

    tokio::time::sleep(config.duration()).await;
    let report = addr
        .request(|reply| ControllerMessage::Finish { reply }, FINISH_TIMEOUT)
        .await?;

    drop(addr);
    if let Err(e) = handle.await {
        warn!(error = %e, "Controller panicked");
    }
    Ok(report)
}
