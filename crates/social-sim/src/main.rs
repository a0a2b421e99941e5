use anyhow::Context as _;
use clap::Parser;
use social_sim::config::SimulationConfig;
use social_sim::lifecycle::setup_tracing;
use social_sim::simulation;
use tracing::info;

/// Runs the social platform load simulation.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Number of synthetic clients.
    #[arg(long, default_value_t = 1_000)]
    clients: usize,

    /// Number of engines (routers), each with its own actor pools.
    #[arg(long, default_value_t = 10)]
    engines: usize,

    /// Run time in seconds.
    #[arg(long, default_value_t = 3)]
    duration: u64,

    /// Seed for engine assignment and client behaviour.
    #[arg(long)]
    seed: Option<u64>,

    /// Actors per domain kind in each engine.
    #[arg(long, default_value_t = 10)]
    pool_size: usize,

    /// Deadline for cross-actor requests and cascades.
    #[arg(long, default_value_t = 5_000)]
    request_timeout_ms: u64,

    /// Upper bound of a client's pause between actions.
    #[arg(long, default_value_t = 1_000)]
    max_action_delay_ms: u64,

    /// Print the report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn into_config(self) -> SimulationConfig {
        let mut config = SimulationConfig {
            clients: self.clients,
            engines: self.engines,
            duration_secs: self.duration,
            seed: self.seed,
            ..Default::default()
        };
        config.backend.pool_size = self.pool_size;
        config.backend.request_timeout_ms = self.request_timeout_ms;
        config.client.max_action_delay_ms = self.max_action_delay_ms;
        config.client.min_action_delay_ms = config
            .client
            .min_action_delay_ms
            .min(self.max_action_delay_ms);
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let cli = Cli::parse();
    let json = cli.json;
    let config = cli.into_config();
    config.validate().context("invalid simulation settings")?;

    info!(?config, "Starting simulation");
    let report = simulation::run(config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
