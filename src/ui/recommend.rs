use eframe::egui::{self, RichText, Ui};

use crate::api::{Recommendation, RecommendationAnalysis};
use crate::api::types::{CombinationAnalysis, SingleDrugAnalysis};
use crate::color;
use crate::data::model::DrugRecord;
use crate::format;
use crate::state::{AppState, BackendStatus};
use crate::ui::{card, stat};

// ---------------------------------------------------------------------------
// Recommendations page
// ---------------------------------------------------------------------------

pub fn recommendations_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Therapeutic Equivalence Recommendations");
    ui.weak("Enter one or two drug names, separated by commas");
    ui.add_space(8.0);

    ui.horizontal(|ui: &mut Ui| {
        let input = ui.add(
            egui::TextEdit::singleline(&mut state.recommendation_input)
                .hint_text("e.g. Lipitor, Eliquis")
                .desired_width(360.0),
        );
        let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        let clicked = ui
            .add_enabled(!state.pending.recommendation, egui::Button::new("Get Recommendation"))
            .clicked();
        if (clicked || submitted) && !state.pending.recommendation {
            state.submit_recommendation();
        }
        if state.pending.recommendation {
            ui.spinner();
        }
    });
    if matches!(state.backend, BackendStatus::Offline) {
        ui.colored_label(color::WARNING, "Backend is offline; requests will fail until it is reachable.");
    }
    ui.add_space(8.0);

    match &state.recommendation {
        Some(rec) => recommendation_result(ui, rec),
        None => {
            ui.weak("No recommendation yet");
        }
    }
}

fn recommendation_result(ui: &mut Ui, rec: &Recommendation) {
    if let Some(saving) = rec.percentage_saving() {
        ui.label(
            RichText::new(format!("Estimated saving {}", format::format_percentage(saving)))
                .size(18.0)
                .strong()
                .color(color::SUCCESS),
        );
        ui.add_space(4.0);
    }
    ui.columns(2, |cols| {
        card(&mut cols[0], "Current Drugs", |ui: &mut Ui| {
            for drug in &rec.original_drugs {
                drug_summary(ui, drug);
            }
        });
        card(&mut cols[1], "Recommended Alternatives", |ui: &mut Ui| {
            for drug in &rec.recommended_drugs {
                drug_summary(ui, drug);
            }
        });
    });
    ui.add_space(8.0);

    card(ui, "Analysis", |ui: &mut Ui| match &rec.analysis {
        RecommendationAnalysis::SingleDrug(a) => single_drug_analysis(ui, a),
        RecommendationAnalysis::Combination(a) => combination_analysis(ui, a),
        RecommendationAnalysis::Unavailable(_) => {
            ui.weak("No analysis available for this combination");
        }
    });
}

fn drug_summary(ui: &mut Ui, drug: &DrugRecord) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(&drug.drug_name);
        let (label, c) = color::te_badge(drug.te_code());
        ui.label(RichText::new(label).color(c).small());
    });
    ui.weak(format!("{} · {} · NDC {}", drug.generic_name, drug.therapeutic_class, drug.ndc));
    if let Some(pmpm) = drug.pmpm() {
        ui.label(format!("PMPM {}", format::format_currency(pmpm)));
    }
    ui.add_space(4.0);
}

fn single_drug_analysis(ui: &mut Ui, a: &SingleDrugAnalysis) {
    ui.horizontal(|ui: &mut Ui| {
        stat(
            ui,
            "Saving per member",
            &format::format_currency(a.cost_saving_per_member),
            Some(color::SUCCESS),
        );
        ui.separator();
        stat(ui, "Percentage saving", &format::format_percentage(a.percentage_saving), None);
    });
    ui.horizontal(|ui: &mut Ui| {
        match_label(ui, "Same therapeutic class", a.therapeutic_class_match);
        match_label(ui, "Same generic", a.generic_match);
    });
}

fn combination_analysis(ui: &mut Ui, a: &CombinationAnalysis) {
    ui.horizontal(|ui: &mut Ui| {
        stat(
            ui,
            "Total saving",
            &format::format_currency(a.total_cost_saving),
            Some(color::SUCCESS),
        );
        ui.separator();
        stat(ui, "Percentage saving", &format::format_percentage(a.percentage_saving), None);
        ui.separator();
        stat(ui, "Safety score", &a.safety_score, Some(color::safety_color(&a.safety_score)));
    });
    let risk = match a.interaction_risk {
        0 => "No known interaction",
        1 => "Low interaction risk",
        _ => "High interaction risk",
    };
    ui.label(RichText::new(risk).strong());
    if !a.interaction_description.is_empty() {
        ui.weak(&a.interaction_description);
    }
}

fn match_label(ui: &mut Ui, text: &str, matched: bool) {
    let (mark, c) = if matched {
        ("✔", color::SUCCESS)
    } else {
        ("✖", color::DESTRUCTIVE)
    };
    ui.colored_label(c, format!("{mark} {text}"));
}
