use actor_runtime::{mock, spawn};
use pretty_assertions::assert_eq;
use social_sim::config::{BackendConfig, ClientConfig, SimulationConfig};
use social_sim::lifecycle::Backend;
use social_sim::simulation::{
    self, ActionKind, ClientActor, ClientMessage, ControllerMessage, SimulationController,
};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn small_run() -> SimulationConfig {
    SimulationConfig {
        clients: 20,
        engines: 2,
        duration_secs: 1,
        seed: Some(7),
        backend: BackendConfig {
            pool_size: 2,
            request_timeout_ms: 2_000,
        },
        client: ClientConfig {
            min_action_delay_ms: 10,
            max_action_delay_ms: 50,
        },
        ..Default::default()
    }
}

/// Pacing slow enough that the wake timer never fires during a test.
fn idle() -> ClientConfig {
    ClientConfig {
        min_action_delay_ms: 60_000,
        max_action_delay_ms: 60_000,
    }
}

#[tokio::test]
async fn test_small_run_signs_up_every_client() {
    let report = simulation::run(small_run()).await.unwrap();

    assert_eq!(report.engine_clients.len(), 2);
    assert_eq!(report.engine_clients.iter().sum::<usize>(), 20);

    let register = report.action(ActionKind::Register).unwrap();
    assert_eq!(register.count, 20);
    assert_eq!(register.errors, 0);
    assert_eq!(report.action(ActionKind::Login).unwrap().count, 20);

    // Clients keep acting after signing up.
    assert!(report.total_requests > 40, "{report}");
    assert_eq!(
        report.total_requests,
        report.successful_requests + report.failed_requests
    );
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_starting() {
    let config = SimulationConfig {
        clients: 0,
        ..small_run()
    };
    assert!(simulation::run(config).await.is_err());
}

#[tokio::test]
async fn test_client_reports_each_action_to_controller() {
    let backend = Backend::start(BackendConfig::default(), 1).unwrap();
    let (controller, mut metrics) = mock::mailbox::<SimulationController>();
    let (client, handle) = spawn(ClientActor::new(
        3,
        backend.client(0),
        controller,
        42,
        &idle(),
    ));

    let snapshot = client
        .request(|reply| ClientMessage::Snapshot { reply }, WAIT)
        .await
        .unwrap();
    assert!(snapshot.logged_in);
    assert!(snapshot.username.unwrap().starts_with("user_3_"));

    let mut actions = Vec::new();
    for _ in 0..2 {
        match metrics.recv_within(WAIT).await {
            Some(ControllerMessage::Metrics(record)) => {
                assert!(record.success(), "{record:?}");
                actions.push(record.action);
            }
            other => panic!("expected Metrics, got {other:?}"),
        }
    }
    assert_eq!(actions, vec![ActionKind::Register, ActionKind::Login]);

    client.send(ClientMessage::Act).unwrap();
    assert!(matches!(
        metrics.recv_within(WAIT).await,
        Some(ControllerMessage::Metrics(_))
    ));

    client.stop().unwrap();
    handle.await.unwrap();
    backend.shutdown().await;
}

#[tokio::test]
async fn test_direct_messages_go_to_fellow_members() {
    let backend = Backend::start(BackendConfig::default(), 1).unwrap();
    let carol = backend.client(0);
    carol.register("carol", "pw").await.unwrap();
    carol.create_community("rust", "", "carol").await.unwrap();

    let (controller, _metrics) = mock::mailbox::<SimulationController>();
    let (client, handle) = spawn(ClientActor::new(
        0,
        backend.client(0),
        controller,
        9,
        &idle(),
    ));
    client
        .send(ClientMessage::Perform(ActionKind::JoinCommunity))
        .unwrap();
    client.send(ClientMessage::Perform(ActionKind::SendDm)).unwrap();

    let snapshot = client
        .request(|reply| ClientMessage::Snapshot { reply }, WAIT)
        .await
        .unwrap();
    assert_eq!(snapshot.joined, vec!["rust".to_string()]);

    let inbox = carol.inbox("carol").await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(Some(inbox[0].from_user_id.clone()), snapshot.username);
    assert_eq!(inbox[0].to_user_id, "carol");

    client.stop().unwrap();
    handle.await.unwrap();
    backend.shutdown().await;
}
