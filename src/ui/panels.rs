use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::color;
use crate::data::filter::{ClassFilter, TeBucket};
use crate::data::model::DrugDataset;
use crate::format;
use crate::state::{AppState, BackendStatus, DataSource, Page, UiAction};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the menu bar: data sources, page navigation and backend status.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open dataset…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Use mock data").clicked() {
                state.set_dataset(
                    DrugDataset::from_records(crate::data::mock::drug_details()),
                    DataSource::Mock,
                );
                state.backend_overview = None;
                state.notify_info("Switched to mock data");
                ui.close_menu();
            }
            ui.separator();
            let online = matches!(state.backend, BackendStatus::Online(_));
            if ui
                .add_enabled(online && !state.pending.drugs, egui::Button::new("Load from backend"))
                .clicked()
            {
                state.request(UiAction::LoadDrugs);
                ui.close_menu();
            }
        });

        ui.separator();

        for page in Page::ALL {
            if ui.selectable_label(state.page == page, page.title()).clicked() {
                state.page = page;
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            backend_indicator(ui, state);
        });
    });
}

fn backend_indicator(ui: &mut Ui, state: &mut AppState) {
    let checking = matches!(state.backend, BackendStatus::Checking);
    if ui
        .add_enabled(!checking, egui::Button::new("⟳").small())
        .on_hover_text("Check backend health")
        .clicked()
    {
        state.request(UiAction::CheckHealth);
    }

    match &state.backend {
        BackendStatus::Unknown => {
            ui.colored_label(color::MUTED, "● Backend unknown");
        }
        BackendStatus::Checking => {
            ui.spinner();
            ui.label("Checking backend…");
        }
        BackendStatus::Online(health) => {
            let c = if health.is_healthy() { color::SUCCESS } else { color::WARNING };
            ui.colored_label(c, format!("● Backend {}", health.status)).on_hover_text(format!(
                "model loaded: {}\ndata loaded: {}\nNLP available: {}",
                health.model_loaded, health.data_loaded, health.nlp_available
            ));
        }
        BackendStatus::Offline => {
            ui.colored_label(color::DESTRUCTIVE, "● Backend offline");
        }
    }
}

// ---------------------------------------------------------------------------
// Left side panel – dataset overview
// ---------------------------------------------------------------------------

/// Render the left panel: data source, record counts and class breakdown.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dataset");
    ui.separator();

    ui.label(RichText::new(state.source.describe()).strong());
    ui.label(format!(
        "{} drugs, {} visible",
        state.dataset.len(),
        state.visible_indices.len()
    ));
    ui.label(format!(
        "{} classes, {} states",
        state.dataset.therapeutic_classes().len(),
        state.dataset.states().len()
    ));
    if state.pending.drugs {
        ui.horizontal(|ui: &mut Ui| {
            ui.spinner();
            ui.label("Loading drugs…");
        });
    }
    ui.separator();

    ui.strong("Therapeutic classes");
    ui.weak("Click to filter the drug database");
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let counts = state.class_counts.clone();
            for class in counts {
                let selected = state.criteria.class == ClassFilter::Only(class.name.clone());
                let text = RichText::new(format!(
                    "{}  ({})",
                    class.name,
                    format::format_count(class.count as i64)
                ))
                .color(state.class_colors.color_for(&class.name));
                if ui.selectable_label(selected, text).clicked() {
                    let next = if selected {
                        ClassFilter::All
                    } else {
                        ClassFilter::Only(class.name)
                    };
                    state.set_class(next);
                    state.page = Page::DrugDatabase;
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Filter widgets
// ---------------------------------------------------------------------------

/// Search box, class selector, TE selector and a reset button.
pub fn filter_controls(ui: &mut Ui, state: &mut AppState) {
    let mut search = state.criteria.search.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut search)
            .hint_text("Search name, generic, NDC or ATC code")
            .desired_width(280.0),
    );
    if response.changed() {
        state.set_search(search);
    }

    let mut class = state.criteria.class.clone();
    egui::ComboBox::from_id_salt("class_filter")
        .selected_text(class.label().to_string())
        .width(200.0)
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut class, ClassFilter::All, ClassFilter::All.label());
            for name in state.dataset.therapeutic_classes() {
                ui.selectable_value(&mut class, ClassFilter::Only(name.clone()), name);
            }
        });
    state.set_class(class);

    let mut te = state.criteria.te;
    egui::ComboBox::from_id_salt("te_filter")
        .selected_text(te.label())
        .show_ui(ui, |ui: &mut Ui| {
            for bucket in TeBucket::CHOICES {
                ui.selectable_value(&mut te, bucket, bucket.label());
            }
        });
    state.set_te_bucket(te);

    if ui
        .add_enabled(!state.criteria.is_identity(), egui::Button::new("Clear filters"))
        .clicked()
    {
        state.clear_filters();
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open drug dataset")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        load_into_state(state, path);
    }
}

/// Load a dataset file, replacing the current dataset on success.
pub fn load_into_state(state: &mut AppState, path: std::path::PathBuf) {
    match crate::data::loader::load_file(&path) {
        Ok(dataset) => {
            log::info!(
                "Loaded {} drugs in {} classes from {}",
                dataset.len(),
                dataset.therapeutic_classes().len(),
                path.display()
            );
            let n = dataset.len();
            state.set_dataset(dataset, DataSource::File(path));
            state.backend_overview = None;
            state.notify_info(format!("Loaded {n} drugs"));
        }
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.notify_error(format!("Error: {e:#}"));
        }
    }
}
