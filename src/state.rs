use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::api::{self, HealthStatus, Recommendation};
use crate::color::CategoryColors;
use crate::data::analysis::{self, ClassCount, CostAnalysis, DrugStats};
use crate::data::filter::{ClassFilter, FilterCriteria, TeBucket, filtered_indices};
use crate::data::mock;
use crate::data::model::{DrugDataset, DrugRecord};
use crate::data::summary::SummaryAggregate;
use crate::worker::BackendEvent;

/// How long a toast stays on screen.
pub const TOAST_LIFETIME: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Small state enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    DrugDatabase,
    Recommendations,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Dashboard, Page::DrugDatabase, Page::Recommendations];

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::DrugDatabase => "Drug Database",
            Page::Recommendations => "Recommendations",
        }
    }
}

/// Where the current dataset came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Mock,
    File(PathBuf),
    Remote,
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            DataSource::Mock => "mock data".to_string(),
            DataSource::File(path) => path.display().to_string(),
            DataSource::Remote => "backend".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendStatus {
    Unknown,
    Checking,
    Online(HealthStatus),
    Offline,
}

/// Requests the UI asked for; executed by the app against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    CheckHealth,
    LoadOverview,
    LoadDrugs,
    Recommend(Vec<String>),
}

/// Requests currently in flight, one flag per event kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pending {
    pub health: bool,
    pub overview: bool,
    pub drugs: bool,
    pub recommendation: bool,
}

// ---------------------------------------------------------------------------
// Toasts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub created: Instant,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub page: Page,

    /// Loaded dataset and where it came from.
    pub dataset: DrugDataset,
    pub source: DataSource,

    /// Drug-database search and selectors.
    pub criteria: FilterCriteria,

    /// Indices of records passing the current criteria (cached).
    pub visible_indices: Vec<usize>,

    /// Totals over `visible_indices` (cached).
    pub summary: SummaryAggregate,

    /// Overview derived from the dataset itself; recomputed with the dataset.
    pub dataset_stats: DrugStats,
    pub dataset_costs: CostAnalysis,
    pub class_counts: Vec<ClassCount>,
    pub class_colors: CategoryColors,

    /// Overview reported by the backend, once fetched.
    pub backend_overview: Option<(DrugStats, CostAnalysis)>,

    pub backend: BackendStatus,

    pub recommendation_input: String,
    pub recommendation: Option<Recommendation>,

    pub pending: Pending,
    pub toasts: Vec<Toast>,

    actions: Vec<UiAction>,
}

impl Default for AppState {
    fn default() -> Self {
        let mut state = Self {
            page: Page::Dashboard,
            dataset: DrugDataset::default(),
            source: DataSource::Mock,
            criteria: FilterCriteria::default(),
            visible_indices: Vec::new(),
            summary: SummaryAggregate::default(),
            dataset_stats: DrugStats::default(),
            dataset_costs: CostAnalysis::default(),
            class_counts: Vec::new(),
            class_colors: CategoryColors::default(),
            backend_overview: None,
            backend: BackendStatus::Unknown,
            recommendation_input: String::new(),
            recommendation: None,
            pending: Pending::default(),
            toasts: Vec::new(),
            actions: Vec::new(),
        };
        state.set_dataset(DrugDataset::from_records(mock::drug_details()), DataSource::Mock);
        state
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and recompute everything derived from it.
    ///
    /// The class option set is only rebuilt here, never on criteria changes.
    pub fn set_dataset(&mut self, dataset: DrugDataset, source: DataSource) {
        self.dataset_stats = DrugStats::from_dataset(&dataset);
        self.dataset_costs = CostAnalysis::from_dataset(&dataset);
        self.class_counts = analysis::class_counts(&dataset);
        self.class_colors = CategoryColors::new(dataset.therapeutic_classes());

        // A class that no longer exists would hide every row.
        if let ClassFilter::Only(class) = &self.criteria.class {
            if !dataset.therapeutic_classes().contains(class) {
                self.criteria.class = ClassFilter::All;
            }
        }

        self.dataset = dataset;
        self.source = source;
        self.refilter();
    }

    /// Recompute `visible_indices` and `summary` after a criteria change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.dataset, &self.criteria);
        self.summary = SummaryAggregate::from_records(self.visible_records());
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &DrugRecord> {
        self.visible_indices
            .iter()
            .filter_map(|&i| self.dataset.get(i))
    }

    pub fn set_search(&mut self, search: String) {
        if self.criteria.search != search {
            self.criteria.search = search;
            self.refilter();
        }
    }

    pub fn set_class(&mut self, class: ClassFilter) {
        if self.criteria.class != class {
            self.criteria.class = class;
            self.refilter();
        }
    }

    pub fn set_te_bucket(&mut self, te: TeBucket) {
        if self.criteria.te != te {
            self.criteria.te = te;
            self.refilter();
        }
    }

    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.refilter();
    }

    /// Statistics to show on the dashboard: the backend's when available.
    pub fn overview(&self) -> (&DrugStats, &CostAnalysis) {
        match &self.backend_overview {
            Some((stats, costs)) => (stats, costs),
            None => (&self.dataset_stats, &self.dataset_costs),
        }
    }

    // -- Actions --------------------------------------------------------------

    pub fn request(&mut self, action: UiAction) {
        match &action {
            UiAction::CheckHealth => {
                self.pending.health = true;
                self.backend = BackendStatus::Checking;
            }
            UiAction::LoadOverview => self.pending.overview = true,
            UiAction::LoadDrugs => self.pending.drugs = true,
            UiAction::Recommend(_) => self.pending.recommendation = true,
        }
        self.actions.push(action);
    }

    pub fn take_actions(&mut self) -> Vec<UiAction> {
        std::mem::take(&mut self.actions)
    }

    /// Validate the recommendation input and queue the request. Blank input
    /// raises a toast and sends nothing.
    pub fn submit_recommendation(&mut self) {
        match api::parse_drug_names(&self.recommendation_input) {
            Ok(names) => self.request(UiAction::Recommend(names)),
            Err(e) => self.notify_error(e.to_string()),
        }
    }

    // -- Backend events -------------------------------------------------------

    /// Fold one finished request into state. Failures leave prior data
    /// untouched and raise a single toast.
    pub fn apply_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Health(result) => {
                self.pending.health = false;
                match result {
                    Ok(health) => {
                        log::info!("Backend status: {}", health.status);
                        self.backend = BackendStatus::Online(health);
                    }
                    Err(e) => {
                        log::warn!("Health check failed: {e}");
                        self.backend = BackendStatus::Offline;
                        self.notify_error(format!("Backend offline: {e}"));
                    }
                }
            }
            BackendEvent::Overview(result) => {
                self.pending.overview = false;
                match result {
                    Ok(overview) => {
                        self.backend_overview = Some(overview);
                        self.notify_info("Loaded statistics from backend");
                    }
                    Err(e) => {
                        log::warn!("Overview request failed: {e}");
                        self.notify_error(format!("Could not load statistics: {e}"));
                    }
                }
            }
            BackendEvent::Drugs(result) => {
                self.pending.drugs = false;
                match result {
                    Ok((records, classes)) => {
                        let dataset = DrugDataset::from_records(records);
                        let n = dataset.len();
                        self.set_dataset(dataset, DataSource::Remote);
                        if !classes.is_empty() {
                            self.class_counts = classes;
                        }
                        self.notify_info(format!("Loaded {n} drugs from backend"));
                    }
                    Err(e) => {
                        log::warn!("Drug list request failed: {e}");
                        self.notify_error(format!("Could not load drugs: {e}"));
                    }
                }
            }
            BackendEvent::Recommendation(result) => {
                self.pending.recommendation = false;
                match result {
                    Ok(rec) => {
                        self.recommendation = Some(rec);
                        self.notify_info("Recommendation generated");
                    }
                    Err(e) => {
                        log::warn!("Recommendation failed: {e}");
                        self.notify_error(e.to_string());
                    }
                }
            }
        }
    }

    // -- Toasts ---------------------------------------------------------------

    pub fn notify_info(&mut self, message: impl Into<String>) {
        self.push_toast(ToastLevel::Info, message.into());
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.push_toast(ToastLevel::Error, message.into());
    }

    fn push_toast(&mut self, level: ToastLevel, message: String) {
        self.toasts.push(Toast {
            level,
            message,
            created: Instant::now(),
        });
    }

    /// Drop toasts older than [`TOAST_LIFETIME`].
    pub fn expire_toasts(&mut self, now: Instant) {
        self.toasts
            .retain(|t| now.saturating_duration_since(t.created) < TOAST_LIFETIME);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, RecommendationAnalysis};
    use crate::data::model::Amount;

    #[test]
    fn starts_with_unfiltered_mock_data() {
        let state = AppState::default();
        assert_eq!(state.source, DataSource::Mock);
        assert_eq!(state.visible_indices.len(), state.dataset.len());
        assert_eq!(state.summary.count, state.dataset.len());
    }

    #[test]
    fn criteria_changes_refresh_cached_results() {
        let mut state = AppState::default();
        state.set_class(ClassFilter::Only("Insulin".into()));
        assert_eq!(state.summary.count, 2);
        assert!(state.visible_records().all(|d| d.therapeutic_class == "Insulin"));

        state.set_search("humalog".into());
        assert_eq!(state.visible_indices.len(), 1);

        state.set_te_bucket(TeBucket::AbRated);
        assert_eq!(state.summary, SummaryAggregate::default());

        state.clear_filters();
        assert_eq!(state.visible_indices.len(), state.dataset.len());
    }

    #[test]
    fn new_dataset_resets_unknown_class_selection() {
        let mut state = AppState::default();
        state.set_class(ClassFilter::Only("Insulin".into()));
        let records = vec![DrugRecord {
            ndc: "1".into(),
            therapeutic_class: "Statins".into(),
            total_drug_cost: Some(Amount::from("$10")),
            ..Default::default()
        }];
        state.set_dataset(DrugDataset::from_records(records), DataSource::Remote);
        assert_eq!(state.criteria.class, ClassFilter::All);
        assert_eq!(state.summary.count, 1);
        assert_eq!(state.summary.total_cost, 10.0);
        assert_eq!(state.dataset.therapeutic_classes(), ["Statins"]);
    }

    #[test]
    fn blank_recommendation_input_is_rejected_locally() {
        let mut state = AppState::default();
        state.recommendation_input = "  , ".into();
        state.submit_recommendation();
        assert!(state.take_actions().is_empty());
        assert!(!state.pending.recommendation);
        assert_eq!(state.toasts.len(), 1);
        assert_eq!(state.toasts[0].level, ToastLevel::Error);
    }

    #[test]
    fn recommendation_input_queues_request() {
        let mut state = AppState::default();
        state.recommendation_input = "Lipitor, Humalog".into();
        state.submit_recommendation();
        assert_eq!(
            state.take_actions(),
            vec![UiAction::Recommend(vec!["Lipitor".into(), "Humalog".into()])]
        );
        assert!(state.pending.recommendation);
    }

    #[test]
    fn health_failure_marks_offline_and_toasts_once() {
        let mut state = AppState::default();
        state.request(UiAction::CheckHealth);
        assert_eq!(state.backend, BackendStatus::Checking);
        state.apply_event(BackendEvent::Health(Err(ApiError::Connection("x".into()))));
        assert_eq!(state.backend, BackendStatus::Offline);
        assert!(!state.pending.health);
        assert_eq!(state.toasts.len(), 1);
    }

    #[test]
    fn failed_fetches_keep_prior_state() {
        let mut state = AppState::default();
        let stats = DrugStats {
            total_drugs: 7,
            ..Default::default()
        };
        state.apply_event(BackendEvent::Overview(Ok((stats.clone(), CostAnalysis::default()))));
        let before_len = state.dataset.len();

        state.apply_event(BackendEvent::Overview(Err(ApiError::Timeout(30))));
        state.apply_event(BackendEvent::Drugs(Err(ApiError::Timeout(30))));
        assert_eq!(state.overview().0, &stats);
        assert_eq!(state.dataset.len(), before_len);
        assert_eq!(state.source, DataSource::Mock);
    }

    #[test]
    fn request_that_never_started_frees_its_controls() {
        let mut state = AppState::default();
        state.request(UiAction::LoadDrugs);
        state.request(UiAction::Recommend(vec!["Lipitor".into()]));
        assert!(state.pending.drugs && state.pending.recommendation);

        let not_started = || ApiError::Http("could not start request: out of threads".into());
        state.apply_event(BackendEvent::Drugs(Err(not_started())));
        state.apply_event(BackendEvent::Recommendation(Err(not_started())));
        assert!(!state.pending.drugs);
        assert!(!state.pending.recommendation);
        assert_eq!(state.toasts.len(), 2);
        assert!(state.toasts.iter().all(|t| t.level == ToastLevel::Error));
    }

    #[test]
    fn successful_recommendation_is_stored() {
        let mut state = AppState::default();
        let rec = Recommendation {
            original_drugs: vec![],
            recommended_drugs: vec![],
            analysis: RecommendationAnalysis::Unavailable(Default::default()),
        };
        state.apply_event(BackendEvent::Recommendation(Ok(rec.clone())));
        assert_eq!(state.recommendation, Some(rec));
    }

    #[test]
    fn toasts_expire() {
        let mut state = AppState::default();
        state.notify_info("hello");
        let created = state.toasts[0].created;
        state.expire_toasts(created + Duration::from_secs(1));
        assert_eq!(state.toasts.len(), 1);
        state.expire_toasts(created + TOAST_LIFETIME);
        assert!(state.toasts.is_empty());
    }
}
