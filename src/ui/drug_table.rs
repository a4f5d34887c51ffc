use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color;
use crate::data::model::DrugRecord;
use crate::format;
use crate::state::AppState;
use crate::ui::{card, panels, stat};

const ROW_HEIGHT: f32 = 22.0;

const HEADERS: [&str; 9] = [
    "NDC",
    "Drug Name",
    "Generic Name",
    "Therapeutic Class",
    "TE Code",
    "Total Cost",
    "Members",
    "PMPM",
    "Avg Age",
];

// ---------------------------------------------------------------------------
// Drug database page
// ---------------------------------------------------------------------------

pub fn drug_database_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Drug Database");
    ui.weak(format!(
        "{} of {} drugs from {}",
        state.visible_indices.len(),
        state.dataset.len(),
        state.source.describe()
    ));
    ui.add_space(8.0);

    summary_cards(ui, state);
    ui.add_space(8.0);

    ui.horizontal(|ui: &mut Ui| {
        panels::filter_controls(ui, state);
    });
    ui.add_space(8.0);

    card(ui, "Drugs", |ui: &mut Ui| {
        if state.dataset.is_empty() {
            ui.weak("No dataset loaded. Use File → Open dataset…");
            return;
        }
        if state.visible_indices.is_empty() {
            ui.weak("No drugs match the current filters");
            return;
        }
        drug_table(ui, state);
    });
}

fn summary_cards(ui: &mut Ui, state: &AppState) {
    let s = &state.summary;
    ui.columns(4, |cols| {
        card(&mut cols[0], "Drugs", |ui: &mut Ui| {
            stat(ui, "matching filters", &format::format_count(s.count as i64), None);
        });
        card(&mut cols[1], "Total Cost", |ui: &mut Ui| {
            stat(ui, "sum over matches", &format::format_dollars(s.total_cost), None);
        });
        card(&mut cols[2], "Members", |ui: &mut Ui| {
            stat(ui, "sum over matches", &format::format_count(s.total_members), None);
        });
        card(&mut cols[3], "Avg Age", |ui: &mut Ui| {
            stat(ui, "mean over matches", &s.rounded_avg_age().to_string(), None);
        });
    });
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

fn drug_table(ui: &mut Ui, state: &AppState) {
    let available_height = ui.available_height();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(60.0), HEADERS.len() - 1)
        .column(Column::remainder())
        .min_scrolled_height(0.0)
        .max_scroll_height(available_height.max(200.0))
        .header(ROW_HEIGHT, |mut header| {
            for title in HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, state.visible_indices.len(), |mut row| {
                let Some(drug) = state
                    .visible_indices
                    .get(row.index())
                    .and_then(|&i| state.dataset.get(i))
                else {
                    return;
                };
                for cell in row_cells(drug) {
                    row.col(|ui: &mut Ui| match cell {
                        Cell::Text(text) => {
                            ui.label(text);
                        }
                        Cell::Class(class) => {
                            ui.colored_label(state.class_colors.color_for(&class), class);
                        }
                        Cell::Badge(code) => {
                            let (label, c) = color::te_badge(code.as_deref());
                            ui.label(RichText::new(label).color(c).strong());
                        }
                    });
                }
            });
        });
}

enum Cell {
    Text(String),
    Class(String),
    Badge(Option<String>),
}

/// Display values for one row, in [`HEADERS`] order.
fn row_cells(drug: &DrugRecord) -> [Cell; 9] {
    [
        Cell::Text(drug.ndc.clone()),
        Cell::Text(drug.drug_name.clone()),
        Cell::Text(drug.generic_name.clone()),
        Cell::Class(drug.therapeutic_class.clone()),
        Cell::Badge(drug.te_code().map(str::to_string)),
        Cell::Text(
            drug.total_drug_cost
                .as_ref()
                .map(|a| a.display_currency())
                .unwrap_or_default(),
        ),
        Cell::Text(
            drug.member_count
                .as_ref()
                .map(|a| a.display_count())
                .unwrap_or_default(),
        ),
        Cell::Text(drug.pmpm().map(format::format_currency).unwrap_or_default()),
        Cell::Text(drug.avg_age.map(|a| format!("{a:.1}")).unwrap_or_default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Amount;

    fn text(cell: &Cell) -> Option<&str> {
        match cell {
            Cell::Text(t) | Cell::Class(t) => Some(t.as_str()),
            Cell::Badge(_) => None,
        }
    }

    #[test]
    fn row_shows_amounts_as_delivered() {
        let drug = DrugRecord {
            ndc: "0071-0155-23".into(),
            therapeutic_class: "Statins".into(),
            therapeutic_equivalence_code: Some("AB".into()),
            total_drug_cost: Some(Amount::from("$1,245,600")),
            member_count: Some(Amount::from(2340.0)),
            pmpm_cost: Some(Amount::from("$45.20")),
            avg_age: Some(62.4),
            ..Default::default()
        };
        let cells = row_cells(&drug);
        assert_eq!(cells.len(), HEADERS.len());
        assert_eq!(text(&cells[0]), Some("0071-0155-23"));
        assert_eq!(text(&cells[5]), Some("$1,245,600"));
        assert_eq!(text(&cells[6]), Some("2,340"));
        assert_eq!(text(&cells[7]), Some("$45.20"));
        assert_eq!(text(&cells[8]), Some("62.4"));
        assert!(matches!(&cells[4], Cell::Badge(Some(code)) if code == "AB"));
    }

    #[test]
    fn missing_values_render_blank() {
        let cells = row_cells(&DrugRecord::default());
        assert_eq!(text(&cells[5]), Some(""));
        assert_eq!(text(&cells[8]), Some(""));
        assert!(matches!(&cells[4], Cell::Badge(None)));
    }
}
