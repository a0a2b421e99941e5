//! Runtime configuration for the backend and the load simulation.
//!
//! Every struct has a `Default` matching the stock simulation (1000 clients
//! against 10 engines for 3 seconds) and is serde-friendly so a run can be
//! described in JSON.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    #[error("zipf exponent must be greater than 1 (got {0})")]
    ZipfExponent(f64),

    #[error("zipf offset must be at least 1 (got {0})")]
    ZipfOffset(f64),

    #[error("min_action_delay_ms ({min}) exceeds max_action_delay_ms ({max})")]
    DelayRange { min: u64, max: u64 },
}

/// Sizing and timeouts for one engine's actor pools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Number of actors per domain kind in each engine.
    pub pool_size: usize,
    /// Deadline for cross-actor requests and cascades.
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            pool_size: 10,
            request_timeout_ms: 5_000,
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// How long a client waits on an engine. Outlasts any relay or cascade
    /// the engine runs on its behalf.
    pub fn client_timeout(&self) -> Duration {
        self.request_timeout() * 2
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::NotPositive { field: "pool_size" });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::NotPositive {
                field: "request_timeout_ms",
            });
        }
        Ok(())
    }
}

/// Pacing of a synthetic client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub min_action_delay_ms: u64,
    pub max_action_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            min_action_delay_ms: 50,
            max_action_delay_ms: 1_000,
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_action_delay_ms == 0 {
            return Err(ConfigError::NotPositive {
                field: "max_action_delay_ms",
            });
        }
        if self.min_action_delay_ms > self.max_action_delay_ms {
            return Err(ConfigError::DelayRange {
                min: self.min_action_delay_ms,
                max: self.max_action_delay_ms,
            });
        }
        Ok(())
    }
}

/// A full simulation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub clients: usize,
    pub engines: usize,
    pub duration_secs: u64,
    /// Seed for the controller RNG; a random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Zipf skew `s` for engine assignment.
    pub zipf_exponent: f64,
    /// Zipf offset `v` for engine assignment.
    pub zipf_offset: f64,
    pub backend: BackendConfig,
    pub client: ClientConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            clients: 1_000,
            engines: 10,
            duration_secs: 3,
            seed: None,
            zipf_exponent: 1.1,
            zipf_offset: 1.0,
            backend: BackendConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clients == 0 {
            return Err(ConfigError::NotPositive { field: "clients" });
        }
        if self.engines == 0 {
            return Err(ConfigError::NotPositive { field: "engines" });
        }
        if self.duration_secs == 0 {
            return Err(ConfigError::NotPositive {
                field: "duration_secs",
            });
        }
        if self.zipf_exponent <= 1.0 || !self.zipf_exponent.is_finite() {
            return Err(ConfigError::ZipfExponent(self.zipf_exponent));
        }
        if self.zipf_offset < 1.0 || !self.zipf_offset.is_finite() {
            return Err(ConfigError::ZipfOffset(self.zipf_offset));
        }
        self.backend.validate()?;
        self.client.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let config = SimulationConfig {
            engines: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "engines" })
        );

        let config = SimulationConfig {
            backend: BackendConfig {
                pool_size: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "pool_size" })
        );
    }

    #[test]
    fn test_client_outwaits_internal_requests() {
        let config = BackendConfig {
            request_timeout_ms: 300,
            ..Default::default()
        };
        assert_eq!(config.client_timeout(), Duration::from_millis(600));
    }

    #[test]
    fn test_rejects_flat_zipf() {
        let config = SimulationConfig {
            zipf_exponent: 1.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZipfExponent(1.0)));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "clients": 25, "backend": { "pool_size": 2 } }"#).unwrap();
        assert_eq!(config.clients, 25);
        assert_eq!(config.engines, 10);
        assert_eq!(config.backend.pool_size, 2);
        assert_eq!(config.backend.request_timeout_ms, 5_000);
    }
}
