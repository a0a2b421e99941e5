//! # Simulation Controller
//!
//! Owns the backend and the client population for one run. Each client is
//! bound to an engine drawn from a Zipf distribution, so a few engines run
//! hot while the rest see a long tail of light traffic. Clients stream a
//! [`MetricsRecord`] per request back to the controller.

use super::client_actor::ClientActor;
use super::metrics::{Metrics, MetricsRecord, MetricsReport};
use super::zipf::Zipf;
use super::SimulationError;
use crate::config::SimulationConfig;
use crate::lifecycle::Backend;
use actor_runtime::{Actor, Addr, Context, Reply};
use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::time::Instant;
use tracing::{info, warn};

#[derive(Debug)]
pub enum ControllerMessage {
    Metrics(MetricsRecord),
    Snapshot { reply: Reply<MetricsReport> },
    /// Stops the clients and the backend, replies with the final report and
    /// stops the controller.
    Finish { reply: Reply<MetricsReport> },
}

pub struct SimulationController {
    config: SimulationConfig,
    backend: Option<Backend>,
    rng: ChaCha8Rng,
    zipf: Zipf,
    metrics: Metrics,
    clients: Vec<Addr<ClientActor>>,
    engine_clients: Vec<usize>,
    started_at: Instant,
}

impl SimulationController {
    pub fn new(config: SimulationConfig, backend: Backend) -> Result<Self, SimulationError> {
        config.validate()?;
        let zipf = Zipf::new(config.engines, config.zipf_exponent, config.zipf_offset)?;
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(seed, clients = config.clients, engines = config.engines, "Simulation seeded");

        Ok(Self {
            engine_clients: vec![0; config.engines],
            rng: ChaCha8Rng::seed_from_u64(seed),
            zipf,
            config,
            backend: Some(backend),
            metrics: Metrics::default(),
            clients: Vec::new(),
            started_at: Instant::now(),
        })
    }

    fn report(&self) -> MetricsReport {
        self.metrics
            .report(self.started_at.elapsed(), self.engine_clients.clone())
    }
}

#[async_trait]
impl Actor for SimulationController {
    type Message = ControllerMessage;

    async fn started(&mut self, ctx: &mut Context<Self>) {
        let (Some(myself), Some(backend)) = (ctx.address(), self.backend.as_ref()) else {
            warn!("Controller started without a backend");
            return;
        };
        for index in 0..self.config.clients {
            let engine = self.zipf.sample(&mut self.rng) % backend.engines().len();
            self.engine_clients[engine] += 1;
            let client = ClientActor::new(
                index,
                backend.client(engine),
                myself.clone(),
                self.rng.gen(),
                &self.config.client,
            );
            self.clients.push(ctx.spawn(client));
        }
        self.started_at = Instant::now();
        info!(clients = self.clients.len(), engine_clients = ?self.engine_clients, "Clients spawned");
    }

    async fn handle(&mut self, msg: ControllerMessage, ctx: &mut Context<Self>) {
        match msg {
            ControllerMessage::Metrics(record) => self.metrics.record(record),
            ControllerMessage::Snapshot { reply } => {
                reply.respond(self.report());
            }
            ControllerMessage::Finish { reply } => {
                let report = self.report();
                for client in self.clients.drain(..) {
                    // Clients that failed to sign up may already be gone.
                    let _ = client.stop();
                }
                if let Some(backend) = self.backend.take() {
                    backend.shutdown().await;
                }
                info!(
                    requests = report.total_requests,
                    failed = report.failed_requests,
                    "Simulation finished"
                );
                reply.respond(report);
                ctx.stop();
            }
        }
    }
}
