use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, ScopedJoinHandle};

use eframe::egui;

use crate::api::{ApiClient, ApiError, HealthStatus, Recommendation};
use crate::data::analysis::{ClassCount, CostAnalysis, DrugStats};
use crate::data::model::DrugRecord;

// ---------------------------------------------------------------------------
// Events sent from request threads back to the UI thread
// ---------------------------------------------------------------------------

/// Completion of one background request. Each variant owns a disjoint slice
/// of [`crate::state::AppState`].
#[derive(Debug)]
pub enum BackendEvent {
    Health(Result<HealthStatus, ApiError>),
    /// Statistics and cost analysis, fetched together.
    Overview(Result<(DrugStats, CostAnalysis), ApiError>),
    /// Drug list and class counts, fetched together.
    Drugs(Result<(Vec<DrugRecord>, Vec<ClassCount>), ApiError>),
    Recommendation(Result<Recommendation, ApiError>),
}

/// Runs backend requests off the UI thread.
///
/// No retries and no cancellation: a request runs to completion (or to the
/// client timeout) and reports exactly one event.
pub struct Backend {
    client: Arc<ApiClient>,
    tx: Sender<BackendEvent>,
    rx: Receiver<BackendEvent>,
    ctx: egui::Context,
}

impl Backend {
    pub fn new(client: ApiClient, ctx: egui::Context) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            client: Arc::new(client),
            tx,
            rx,
            ctx,
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Drain finished requests without blocking.
    pub fn poll(&self) -> Vec<BackendEvent> {
        self.rx.try_iter().collect()
    }

    pub fn check_health(&self) {
        self.spawn(
            "health",
            |e| BackendEvent::Health(Err(e)),
            |client| BackendEvent::Health(client.health()),
        );
    }

    /// Fetch statistics and cost analysis concurrently; report once both are in.
    pub fn fetch_overview(&self) {
        self.spawn("overview", |e| BackendEvent::Overview(Err(e)), |client| {
            let (stats, costs) = thread::scope(|s| {
                let stats = s.spawn(|| client.drug_stats());
                let costs = s.spawn(|| client.cost_analysis());
                (join(stats), join(costs))
            });
            BackendEvent::Overview(stats.and_then(|stats| costs.map(|costs| (stats, costs))))
        });
    }

    pub fn fetch_drugs(&self) {
        self.spawn("drugs", |e| BackendEvent::Drugs(Err(e)), |client| {
            let (drugs, classes) = thread::scope(|s| {
                let drugs = s.spawn(|| client.drugs());
                let classes = s.spawn(|| client.therapeutic_classes());
                (join(drugs), join(classes))
            });
            BackendEvent::Drugs(drugs.and_then(|drugs| classes.map(|classes| (drugs, classes))))
        });
    }

    pub fn request_recommendation(&self, drug_names: Vec<String>) {
        self.spawn("recommend", |e| BackendEvent::Recommendation(Err(e)), move |client| {
            BackendEvent::Recommendation(client.recommend(&drug_names))
        });
    }

    /// Run `job` on a named thread. If the thread cannot be started, the
    /// request still reports once, as `failed` with the spawn error.
    fn spawn<F>(&self, name: &str, failed: fn(ApiError) -> BackendEvent, job: F)
    where
        F: FnOnce(&ApiClient) -> BackendEvent + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let ctx = self.ctx.clone();
        let task = name.to_string();

        let spawned = thread::Builder::new()
            .name(format!("backend-{name}"))
            .spawn(move || {
                log::debug!("Request {task} started");
                let event = job(&client);
                if tx.send(event).is_err() {
                    log::debug!("Request {task} finished after the UI closed");
                    return;
                }
                ctx.request_repaint();
            });

        if let Err(e) = spawned {
            self.report_spawn_failure(name, failed, e);
        }
    }

    fn report_spawn_failure(
        &self,
        name: &str,
        failed: fn(ApiError) -> BackendEvent,
        e: std::io::Error,
    ) {
        log::error!("Failed to start request thread {name}: {e}");
        let err = ApiError::Http(format!("could not start request: {e}"));
        if self.tx.send(failed(err)).is_ok() {
            self.ctx.request_repaint();
        }
    }
}

fn join<T>(handle: ScopedJoinHandle<'_, Result<T, ApiError>>) -> Result<T, ApiError> {
    handle.join().unwrap_or_else(|_| Err(ApiError::WorkerPanicked))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn unreachable_backend() -> Backend {
        // Port 1 on loopback refuses connections immediately.
        let client = ApiClient::new("http://127.0.0.1:1", 2).unwrap();
        Backend::new(client, egui::Context::default())
    }

    fn next_event(backend: &Backend) -> BackendEvent {
        backend
            .rx
            .recv_timeout(Duration::from_secs(10))
            .expect("request thread reported")
    }

    #[test]
    fn health_failure_is_reported_once() {
        let backend = unreachable_backend();
        backend.check_health();
        match next_event(&backend) {
            BackendEvent::Health(result) => assert!(result.is_err()),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(backend.poll().is_empty());
    }

    #[test]
    fn overview_joins_both_requests_into_one_event() {
        let backend = unreachable_backend();
        backend.fetch_overview();
        match next_event(&backend) {
            BackendEvent::Overview(result) => assert!(result.is_err()),
            other => panic!("unexpected event {other:?}"),
        }
        std::thread::sleep(Duration::from_millis(50));
        assert!(backend.poll().is_empty());
    }

    #[test]
    fn thread_start_failure_still_reports() {
        let backend = unreachable_backend();
        backend.report_spawn_failure(
            "drugs",
            |e| BackendEvent::Drugs(Err(e)),
            std::io::Error::other("out of threads"),
        );
        let events = backend.poll();
        assert_eq!(events.len(), 1);
        match &events[0] {
            BackendEvent::Drugs(Err(ApiError::Http(msg))) => assert!(msg.contains("out of threads")),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn poll_without_requests_is_empty() {
        assert!(unreachable_backend().poll().is_empty());
    }
}
