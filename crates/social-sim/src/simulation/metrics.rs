//! Per-action latency and outcome aggregation for a simulation run.

use crate::error::DomainResult;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

const TOP_ERRORS: usize = 3;

/// Everything a synthetic client can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Register,
    Login,
    CreateCommunity,
    JoinCommunity,
    LeaveCommunity,
    CreatePost,
    CreateComment,
    VotePost,
    VoteComment,
    SendDm,
    Search,
    GetFeed,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Register => "register",
            ActionKind::Login => "login",
            ActionKind::CreateCommunity => "create_community",
            ActionKind::JoinCommunity => "join_community",
            ActionKind::LeaveCommunity => "leave_community",
            ActionKind::CreatePost => "create_post",
            ActionKind::CreateComment => "create_comment",
            ActionKind::VotePost => "vote_post",
            ActionKind::VoteComment => "vote_comment",
            ActionKind::SendDm => "send_dm",
            ActionKind::Search => "search",
            ActionKind::GetFeed => "get_feed",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed client request.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsRecord {
    pub action: ActionKind,
    pub latency: Duration,
    /// `None` on success.
    pub error: Option<String>,
}

impl MetricsRecord {
    pub fn from_result<T>(action: ActionKind, latency: Duration, result: &DomainResult<T>) -> Self {
        Self {
            action,
            latency,
            error: result.as_ref().err().map(|e| e.to_string()),
        }
    }

    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Default)]
struct ActionStats {
    errors: u64,
    latencies: Vec<Duration>,
    error_messages: HashMap<String, u64>,
}

/// Running totals; turned into a [`MetricsReport`] on demand.
#[derive(Debug, Default)]
pub struct Metrics {
    total: u64,
    failed: u64,
    actions: BTreeMap<ActionKind, ActionStats>,
}

impl Metrics {
    pub fn record(&mut self, record: MetricsRecord) {
        self.total += 1;
        let stats = self.actions.entry(record.action).or_default();
        stats.latencies.push(record.latency);
        if let Some(error) = record.error {
            self.failed += 1;
            stats.errors += 1;
            *stats.error_messages.entry(error).or_default() += 1;
        }
    }

    pub fn report(&self, elapsed: Duration, engine_clients: Vec<usize>) -> MetricsReport {
        let actions = self
            .actions
            .iter()
            .map(|(&action, stats)| ActionReport::new(action, stats))
            .collect();
        let secs = elapsed.as_secs_f64();
        MetricsReport {
            total_requests: self.total,
            successful_requests: self.total - self.failed,
            failed_requests: self.failed,
            elapsed_ms: millis(elapsed),
            requests_per_sec: if secs > 0.0 { self.total as f64 / secs } else { 0.0 },
            engine_clients,
            actions,
        }
    }
}

fn millis(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

fn mean_millis(total: Duration, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    millis(total) / count as f64
}

/// Nearest-rank percentile of an ascending slice.
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionReport {
    pub action: ActionKind,
    pub count: u64,
    pub errors: u64,
    pub avg_ms: f64,
    pub p50_ms: f64,
    pub p99_ms: f64,
    pub max_ms: f64,
    /// Most frequent error messages, most common first.
    pub top_errors: Vec<(String, u64)>,
}

impl ActionReport {
    fn new(action: ActionKind, stats: &ActionStats) -> Self {
        let mut sorted = stats.latencies.clone();
        sorted.sort();
        let count = sorted.len() as u64;
        let total: Duration = sorted.iter().sum();

        let mut top_errors: Vec<(String, u64)> = stats
            .error_messages
            .iter()
            .map(|(message, n)| (message.clone(), *n))
            .collect();
        top_errors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_errors.truncate(TOP_ERRORS);

        Self {
            action,
            count,
            errors: stats.errors,
            avg_ms: mean_millis(total, count),
            p50_ms: millis(percentile(&sorted, 50.0)),
            p99_ms: millis(percentile(&sorted, 99.0)),
            max_ms: millis(sorted.last().copied().unwrap_or_default()),
            top_errors,
        }
    }
}

/// Final (or intermediate) outcome of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub elapsed_ms: f64,
    pub requests_per_sec: f64,
    /// Clients assigned to each engine.
    pub engine_clients: Vec<usize>,
    pub actions: Vec<ActionReport>,
}

impl MetricsReport {
    pub fn action(&self, action: ActionKind) -> Option<&ActionReport> {
        self.actions.iter().find(|a| a.action == action)
    }
}

impl fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation results")?;
        writeln!(f, "  elapsed:        {:.0} ms", self.elapsed_ms)?;
        writeln!(f, "  requests:       {}", self.total_requests)?;
        writeln!(f, "  successful:     {}", self.successful_requests)?;
        writeln!(f, "  failed:         {}", self.failed_requests)?;
        writeln!(f, "  throughput:     {:.1} req/s", self.requests_per_sec)?;
        writeln!(f, "  engine clients: {:?}", self.engine_clients)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<18} {:>8} {:>8} {:>10} {:>10} {:>10} {:>10}",
            "action", "count", "errors", "avg ms", "p50 ms", "p99 ms", "max ms"
        )?;
        for a in &self.actions {
            writeln!(
                f,
                "{:<18} {:>8} {:>8} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
                a.action.as_str(),
                a.count,
                a.errors,
                a.avg_ms,
                a.p50_ms,
                a.p99_ms,
                a.max_ms
            )?;
            for (message, n) in &a.top_errors {
                writeln!(f, "    {n:>6} x {message}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_counts_and_percentiles() {
        let mut metrics = Metrics::default();
        for n in 1..=100 {
            metrics.record(MetricsRecord {
                action: ActionKind::Search,
                latency: ms(n),
                error: None,
            });
        }
        let report = metrics.report(Duration::from_secs(2), vec![1]);
        let search = report.action(ActionKind::Search).unwrap();

        assert_eq!(report.total_requests, 100);
        assert_eq!(report.successful_requests, 100);
        assert_eq!(search.p50_ms, 50.0);
        assert_eq!(search.p99_ms, 99.0);
        assert_eq!(search.max_ms, 100.0);
        assert!((search.avg_ms - 50.5).abs() < 1e-6);
        assert!((report.requests_per_sec - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_mean_handles_counts_beyond_u32() {
        let count = u64::from(u32::MAX) + 1;
        let total = Duration::from_millis(3) * 2 * (u32::MAX / 2 + 1);
        assert!((mean_millis(total, count) - 3.0).abs() < 1e-6);
        assert_eq!(mean_millis(Duration::ZERO, 0), 0.0);
    }

    #[test]
    fn test_top_errors_are_ranked() {
        let mut metrics = Metrics::default();
        let fail = |msg: &str| -> DomainResult<()> { Err(DomainError::conflict(msg)) };
        for msg in ["User is already a member", "Community not found", "User is already a member"] {
            metrics.record(MetricsRecord::from_result(
                ActionKind::JoinCommunity,
                ms(1),
                &fail(msg),
            ));
        }
        metrics.record(MetricsRecord::from_result(
            ActionKind::JoinCommunity,
            ms(1),
            &Ok(()),
        ));

        let report = metrics.report(Duration::from_secs(1), vec![]);
        let join = report.action(ActionKind::JoinCommunity).unwrap();
        assert_eq!(report.failed_requests, 3);
        assert_eq!(join.count, 4);
        assert_eq!(
            join.top_errors,
            vec![
                ("User is already a member".to_string(), 2),
                ("Community not found".to_string(), 1),
            ]
        );
        assert!(report.to_string().contains("join_community"));
    }

    #[test]
    fn test_report_serializes_action_names() {
        let mut metrics = Metrics::default();
        metrics.record(MetricsRecord {
            action: ActionKind::SendDm,
            latency: ms(3),
            error: None,
        });
        let json = serde_json::to_value(metrics.report(ms(10), vec![1, 0])).unwrap();
        assert_eq!(json["actions"][0]["action"], "send_dm");
        assert_eq!(json["engine_clients"], serde_json::json!([1, 0]));
    }
}
