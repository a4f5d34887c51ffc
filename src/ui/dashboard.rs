use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color;
use crate::data::mock::{self, ScenarioResult, TeRecommendation};
use crate::format::{self, KpiFormat};
use crate::state::{AppState, BackendStatus, UiAction};
use crate::ui::{card, plot, stat};

/// Number of switch opportunities listed on the dashboard.
const TOP_OPPORTUNITIES: usize = 3;
/// Access score at or above which a scenario meets target.
const ACCESS_TARGET: f64 = 95.0;
/// Savings above which a scenario is labelled high impact.
const HIGH_IMPACT_SAVINGS: f64 = 1_000_000.0;

// ---------------------------------------------------------------------------
// Dashboard page
// ---------------------------------------------------------------------------

pub fn dashboard_page(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("PBM Dashboard");
            ui.weak("Monitor pharmacy benefit performance and cost optimization opportunities");
            ui.add_space(8.0);

            let recommendations = mock::te_recommendations();
            opportunity_banner(ui, &recommendations);
            ui.add_space(8.0);

            kpi_row(ui);
            ui.add_space(8.0);

            ui.columns(2, |cols| {
                card(&mut cols[0], "PMPM Trend vs Target", |ui: &mut Ui| {
                    plot::pmpm_trend_chart(ui, &mock::pmpm_trend());
                });
                card(&mut cols[1], "Drug Category Utilization", |ui: &mut Ui| {
                    plot::utilization_chart(ui, &mock::utilization_trends());
                });
            });
            ui.add_space(8.0);

            ui.columns(2, |cols| {
                card(&mut cols[0], "Formulary Tier Distribution", |ui: &mut Ui| {
                    plot::tier_chart(ui, &mock::tier_distribution());
                });
                card(&mut cols[1], "Top TE Opportunities", |ui: &mut Ui| {
                    top_opportunities(ui, &recommendations);
                });
            });
            ui.add_space(8.0);

            if let Some(scenario) = mock::scenario_results().first() {
                impact_widget(ui, "Impact Analysis", scenario);
                ui.add_space(8.0);
            }

            overview_section(ui, state);
        });
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

fn opportunity_banner(ui: &mut Ui, recommendations: &[TeRecommendation]) {
    let savings: f64 = recommendations.iter().map(|r| r.potential_savings).sum();
    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(1.5, color::WARNING))
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new("Cost Optimization Opportunity").strong());
            ui.weak(format!(
                "{} therapeutic equivalence recommendations available with potential {} annual savings",
                recommendations.len(),
                format::format_compact_dollars(savings)
            ));
        });
}

fn kpi_row(ui: &mut Ui) {
    let kpis = mock::kpis();
    let cards = [
        ("PMPM Cost", kpis.pmpm, kpis.pmpm_trend, KpiFormat::Currency),
        ("Cost Reduction", kpis.cost_reduction_percent, 2.1, KpiFormat::Percentage),
        ("Member Access", kpis.member_access_percent, 0.3, KpiFormat::Percentage),
        ("Generic Fill Rate", kpis.generic_fill_rate, 1.8, KpiFormat::Percentage),
    ];
    ui.columns(cards.len(), |cols| {
        for (col, (title, value, change, fmt)) in cols.iter_mut().zip(cards) {
            kpi_card(col, title, value, Some(change), fmt);
        }
    });
}

/// One KPI: formatted value plus a change line coloured by sentiment.
pub fn kpi_card(ui: &mut Ui, title: &str, value: f64, change: Option<f64>, fmt: KpiFormat) {
    card(ui, title, |ui: &mut Ui| {
        ui.label(RichText::new(format::format_kpi(value, fmt)).size(22.0).strong());
        if let Some(change) = change {
            let sentiment = format::trend_sentiment(title, change);
            ui.label(
                RichText::new(format!(
                    "{} {}",
                    format::trend_arrow(change),
                    format::format_change(change, None)
                ))
                .color(color::trend_color(sentiment)),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Recommendations and impact
// ---------------------------------------------------------------------------

fn top_opportunities(ui: &mut Ui, recommendations: &[TeRecommendation]) {
    if recommendations.is_empty() {
        ui.weak("No opportunities identified");
        return;
    }
    for rec in recommendations.iter().take(TOP_OPPORTUNITIES) {
        egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui: &mut Ui| {
                ui.vertical(|ui: &mut Ui| {
                    ui.strong(rec.current_drug);
                    ui.weak(format!("→ {}", rec.recommended_drug));
                    ui.weak(format!("{} → {}  ({})", rec.current_ndc, rec.recommended_ndc, rec.te_code));
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
                    ui.vertical(|ui: &mut Ui| {
                        ui.label(
                            RichText::new(format::format_dollars(rec.potential_savings))
                                .strong()
                                .color(color::SUCCESS),
                        );
                        ui.weak(format!("{}% confidence", rec.confidence_score));
                        ui.weak(format!(
                            "{} per member",
                            format::format_currency(rec.savings_per_member)
                        ));
                    });
                });
            });
        });
    }
}

/// Scenario summary: PMPM change, affected members, savings and access.
pub fn impact_widget(ui: &mut Ui, title: &str, scenario: &ScenarioResult) {
    let pmpm_change = scenario.new_pmpm - mock::kpis().pmpm;
    let meets_target = scenario.access_score >= ACCESS_TARGET;
    let high_impact = scenario.projected_savings > HIGH_IMPACT_SAVINGS;

    card(ui, title, |ui: &mut Ui| {
        ui.weak(scenario.scenario_name);
        ui.horizontal(|ui: &mut Ui| {
            let (arrow, change_color) = if pmpm_change < 0.0 {
                ("▼", color::SUCCESS)
            } else {
                ("▲", color::DESTRUCTIVE)
            };
            stat(
                ui,
                "PMPM Change",
                &format!("{arrow} {}", format::format_currency(pmpm_change.abs())),
                Some(change_color),
            );
            ui.separator();
            stat(ui, "Affected", &format::format_count(scenario.affected_members as i64), None);
            ui.separator();
            stat(
                ui,
                "Total Savings",
                &format::format_dollars(scenario.projected_savings),
                Some(color::SUCCESS),
            );
            ui.separator();
            stat(
                ui,
                "Access Score",
                &format::format_percentage(scenario.access_score),
                Some(if meets_target { color::SUCCESS } else { color::WARNING }),
            );
            ui.separator();
            stat(ui, "ROI", &format::format_percentage(scenario.roi_percentage), None);
        });
        ui.horizontal(|ui: &mut Ui| {
            badge(ui, if meets_target { "Meets Target" } else { "Below Target" }, meets_target);
            badge(ui, if high_impact { "High Impact" } else { "Moderate Impact" }, high_impact);
        });
    });
}

fn badge(ui: &mut Ui, text: &str, emphasised: bool) {
    let fill = if emphasised { color::PRIMARY } else { Color32::from_gray(90) };
    egui::Frame::new()
        .fill(fill)
        .corner_radius(6.0)
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new(text).small().color(Color32::WHITE));
        });
}

// ---------------------------------------------------------------------------
// Dataset / backend overview
// ---------------------------------------------------------------------------

/// Statistics and cost analysis, from the backend once fetched, otherwise
/// computed from the loaded dataset.
fn overview_section(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Drug Data Overview");
        let origin = if state.backend_overview.is_some() {
            "backend".to_string()
        } else {
            state.source.describe()
        };
        ui.weak(format!("from {origin}"));

        let online = matches!(state.backend, BackendStatus::Online(_));
        ui.add_enabled_ui(online && !state.pending.overview, |ui: &mut Ui| {
            if ui.button("Load backend statistics").clicked() {
                state.request(UiAction::LoadOverview);
            }
        });
        if state.pending.overview {
            ui.spinner();
        }
    });
    ui.add_space(4.0);

    let (stats, costs) = state.overview();

    ui.columns(4, |cols| {
        kpi_card(&mut cols[0], "Total Drugs", stats.total_drugs as f64, None, KpiFormat::Number);
        kpi_card(&mut cols[1], "Total Cost", stats.total_cost, None, KpiFormat::Currency);
        kpi_card(&mut cols[2], "Average PMPM", stats.avg_pmpm, None, KpiFormat::Currency);
        kpi_card(&mut cols[3], "Total Members", stats.total_members as f64, None, KpiFormat::Number);
    });
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.weak(format!(
            "{} therapeutic classes, {} states, mean age {:.1}",
            stats.therapeutic_classes, stats.states_covered, stats.avg_age
        ));
        ui.separator();
        for (code, n) in &stats.te_codes_distribution {
            let (label, c) = color::te_badge(Some(code));
            ui.colored_label(c, format!("{label}: {n}"));
        }
    });
    ui.add_space(8.0);

    ui.columns(3, |cols| {
        card(&mut cols[0], "Cost by Therapeutic Class", |ui: &mut Ui| {
            plot::cost_by_class_chart(ui, costs, &state.class_colors);
        });
        card(&mut cols[1], "PMPM by State", |ui: &mut Ui| {
            plot::pmpm_by_state_chart(ui, costs);
        });
        card(&mut cols[2], "Age Distribution", |ui: &mut Ui| {
            plot::age_distribution_chart(ui, costs);
        });
    });
}
