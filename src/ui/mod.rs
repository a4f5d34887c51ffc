pub mod dashboard;
pub mod drug_table;
pub mod notifications;
pub mod panels;
pub mod plot;
pub mod recommend;

use eframe::egui::{self, Color32, RichText, Ui};

/// Framed card with a title line.
pub(crate) fn card<R>(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
    egui::Frame::group(ui.style())
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).strong().size(15.0));
            ui.add_space(4.0);
            add_contents(ui)
        })
        .inner
}

/// Small caption above a large value, used by KPI and summary cards.
pub(crate) fn stat(ui: &mut Ui, caption: &str, value: &str, color: Option<Color32>) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(caption).small().weak());
        let mut text = RichText::new(value).size(20.0).strong();
        if let Some(c) = color {
            text = text.color(c);
        }
        ui.label(text);
    });
}
