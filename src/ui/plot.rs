use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, LineStyle, Plot};

use crate::color::{self, CategoryColors};
use crate::data::analysis::CostAnalysis;
use crate::data::mock::{PmpmPoint, TierShare, UtilizationTrend};
use crate::format;

const CHART_HEIGHT: f32 = 240.0;

// ---------------------------------------------------------------------------
// Shared plot setup
// ---------------------------------------------------------------------------

/// A static chart: no dragging or zooming, categories on the x axis.
fn category_plot<'a>(id: &str, labels: Vec<String>) -> Plot<'a> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(category_formatter(labels))
}

/// Axis labels for integer positions `0..labels.len()`.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > f64::EPSILON || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

fn no_data(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.weak("No data");
    });
}

/// Single-series bar chart, one bar per `(label, value)`.
fn bars(ui: &mut Ui, id: &str, series: &str, items: &[(String, f64)], color_of: impl Fn(&str) -> Color32) {
    if items.is_empty() {
        no_data(ui);
        return;
    }
    let labels: Vec<String> = items.iter().map(|(l, _)| l.clone()).collect();
    let bars: Vec<Bar> = items
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            Bar::new(i as f64, *value)
                .name(label)
                .fill(color_of(label))
                .width(0.6)
        })
        .collect();

    category_plot(id, labels).include_y(0.0).show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).name(series));
    });
}

// ---------------------------------------------------------------------------
// Dashboard charts (mock data)
// ---------------------------------------------------------------------------

/// Actual PMPM against target and baseline, one point per month.
pub fn pmpm_trend_chart(ui: &mut Ui, points: &[PmpmPoint]) {
    if points.is_empty() {
        no_data(ui);
        return;
    }
    let labels = points.iter().map(|p| p.month.to_string()).collect();
    let series = |f: fn(&PmpmPoint) -> f64| -> Vec<[f64; 2]> {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| [i as f64, f(p)])
            .collect()
    };

    category_plot("pmpm_trend", labels)
        .y_axis_formatter(|mark, _range| format!("${:.0}", mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(series(|p| p.pmpm))
                    .name("Actual PMPM")
                    .color(color::PRIMARY)
                    .width(3.0),
            );
            plot_ui.line(
                Line::new(series(|p| p.target))
                    .name("Target")
                    .color(color::SUCCESS)
                    .style(LineStyle::dashed_loose()),
            );
            plot_ui.line(
                Line::new(series(|p| p.baseline))
                    .name("Baseline")
                    .color(color::MUTED)
                    .style(LineStyle::dotted_dense()),
            );
        });
}

/// Current versus projected utilisation per drug category.
pub fn utilization_chart(ui: &mut Ui, trends: &[UtilizationTrend]) {
    if trends.is_empty() {
        no_data(ui);
        return;
    }
    let labels = trends.iter().map(|t| t.category.to_string()).collect();
    let grouped = |offset: f64, value: fn(&UtilizationTrend) -> f64| -> Vec<Bar> {
        trends
            .iter()
            .enumerate()
            .map(|(i, t)| Bar::new(i as f64 + offset, value(t)).name(t.category).width(0.35))
            .collect()
    };

    category_plot("utilization", labels).include_y(0.0).show(ui, |plot_ui| {
        plot_ui.bar_chart(
            BarChart::new(grouped(-0.18, |t| t.current))
                .name("Current")
                .color(color::PRIMARY),
        );
        plot_ui.bar_chart(
            BarChart::new(grouped(0.18, |t| t.projected))
                .name("Projected")
                .color(color::PRIMARY_LIGHT),
        );
    });
}

/// Formulary tier shares. Drawn as bars with a colour legend underneath.
pub fn tier_chart(ui: &mut Ui, tiers: &[TierShare]) {
    let names: Vec<&str> = tiers.iter().map(|t| t.name).collect();
    let colors = CategoryColors::new(names.as_slice());
    let items: Vec<(String, f64)> = tiers.iter().map(|t| (t.name.to_string(), t.value)).collect();

    bars(ui, "tiers", "Share of formulary (%)", &items, |l| colors.color_for(l));

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for tier in tiers {
            ui.colored_label(colors.color_for(tier.name), "●");
            ui.label(format!("{}: {}%", tier.name, tier.value));
            ui.add_space(8.0);
        }
    });
}

// ---------------------------------------------------------------------------
// Cost analysis charts (dataset or backend)
// ---------------------------------------------------------------------------

/// Total drug cost per therapeutic class, largest first.
pub fn cost_by_class_chart(ui: &mut Ui, costs: &CostAnalysis, colors: &CategoryColors) {
    let mut items: Vec<(String, f64)> = costs
        .cost_by_therapeutic_class
        .iter()
        .map(|(class, cost)| (class.clone(), *cost))
        .collect();
    items.sort_by(|a, b| b.1.total_cmp(&a.1));

    bars(ui, "cost_by_class", "Total cost", &items, |l| colors.color_for(l));
    if let Some((class, cost)) = items.first() {
        ui.weak(format!("Largest: {class} ({})", format::format_compact_dollars(*cost)));
    }
}

/// Mean PMPM per state.
pub fn pmpm_by_state_chart(ui: &mut Ui, costs: &CostAnalysis) {
    let items: Vec<(String, f64)> = costs
        .pmpm_by_state
        .iter()
        .map(|(state, pmpm)| (state.clone(), *pmpm))
        .collect();
    bars(ui, "pmpm_by_state", "Mean PMPM", &items, |_| color::PRIMARY);
}

/// Record counts per age band, in band order.
pub fn age_distribution_chart(ui: &mut Ui, costs: &CostAnalysis) {
    let items: Vec<(String, f64)> = costs
        .age_bins_ordered()
        .into_iter()
        .map(|(label, n)| (label.to_string(), n as f64))
        .collect();
    if items.iter().all(|(_, n)| *n == 0.0) {
        no_data(ui);
        return;
    }
    bars(ui, "age_distribution", "Drugs", &items, |_| color::PRIMARY_LIGHT);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(value: f64) -> GridMark {
        GridMark {
            value,
            step_size: 1.0,
        }
    }

    #[test]
    fn category_axis_labels_integer_positions_only() {
        let fmt = category_formatter(vec!["Jan".into(), "Feb".into()]);
        let range = 0.0..=1.0;
        assert_eq!(fmt(mark(0.0), &range), "Jan");
        assert_eq!(fmt(mark(1.0), &range), "Feb");
        assert_eq!(fmt(mark(0.5), &range), "");
        assert_eq!(fmt(mark(2.0), &range), "");
        assert_eq!(fmt(mark(-1.0), &range), "");
    }
}
