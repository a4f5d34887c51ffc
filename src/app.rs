use std::time::Instant;

use eframe::egui;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::state::{AppState, Page, TOAST_LIFETIME, UiAction};
use crate::ui::{dashboard, drug_table, notifications, panels, recommend};
use crate::worker::Backend;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PbmDashboardApp {
    pub state: AppState,
    /// `None` when the HTTP client could not be built; backend actions then
    /// fail with a toast.
    backend: Option<Backend>,
}

impl PbmDashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut state = AppState::default();

        if let Some(path) = config.dataset.clone() {
            panels::load_into_state(&mut state, path);
        }

        let backend = match ApiClient::new(&config.api_url, config.timeout_secs) {
            Ok(client) => {
                log::info!("Using backend at {}", client.base_url());
                Some(Backend::new(client, cc.egui_ctx.clone()))
            }
            Err(e) => {
                log::error!("Backend client unavailable: {e}");
                state.notify_error(format!("Backend client unavailable: {e}"));
                None
            }
        };

        let mut app = Self { state, backend };
        app.state.request(UiAction::CheckHealth);
        app.dispatch_actions();
        app
    }

    /// Hand queued UI actions to the backend.
    fn dispatch_actions(&mut self) {
        for action in self.state.take_actions() {
            let Some(backend) = &self.backend else {
                self.state.apply_event(unavailable(action));
                continue;
            };
            log::debug!("Dispatching {action:?} to {}", backend.base_url());
            match action {
                UiAction::CheckHealth => backend.check_health(),
                UiAction::LoadOverview => backend.fetch_overview(),
                UiAction::LoadDrugs => backend.fetch_drugs(),
                UiAction::Recommend(names) => backend.request_recommendation(names),
            }
        }
    }
}

/// Failure event for an action that cannot run without a backend.
fn unavailable(action: UiAction) -> crate::worker::BackendEvent {
    use crate::api::ApiError;
    use crate::worker::BackendEvent;

    let err = ApiError::Http("no HTTP client".to_string());
    match action {
        UiAction::CheckHealth => BackendEvent::Health(Err(err)),
        UiAction::LoadOverview => BackendEvent::Overview(Err(err)),
        UiAction::LoadDrugs => BackendEvent::Drugs(Err(err)),
        UiAction::Recommend(_) => BackendEvent::Recommendation(Err(err)),
    }
}

impl eframe::App for PbmDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Finished background requests ----
        if let Some(backend) = &self.backend {
            for event in backend.poll() {
                self.state.apply_event(event);
            }
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: dataset overview ----
        egui::SidePanel::left("dataset_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: current page ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.page {
            Page::Dashboard => dashboard::dashboard_page(ui, &mut self.state),
            Page::DrugDatabase => drug_table::drug_database_page(ui, &mut self.state),
            Page::Recommendations => recommend::recommendations_page(ui, &mut self.state),
        });

        notifications::toasts(ctx, &self.state);

        self.dispatch_actions();

        // ---- Toast expiry ----
        self.state.expire_toasts(Instant::now());
        if !self.state.toasts.is_empty() {
            ctx.request_repaint_after(TOAST_LIFETIME / 5);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::BackendStatus;

    #[test]
    fn actions_without_backend_fail_into_state() {
        let mut app = PbmDashboardApp {
            state: AppState::default(),
            backend: None,
        };
        app.state.request(UiAction::CheckHealth);
        app.state.request(UiAction::LoadDrugs);
        app.dispatch_actions();

        assert_eq!(app.state.backend, BackendStatus::Offline);
        assert!(!app.state.pending.health);
        assert!(!app.state.pending.drugs);
        assert_eq!(app.state.toasts.len(), 2);
    }
}
