use eframe::egui::{self, Context, RichText};

use crate::color;
use crate::state::{AppState, ToastLevel};

/// Draw pending toasts stacked in the bottom-right corner.
pub fn toasts(ctx: &Context, state: &AppState) {
    if state.toasts.is_empty() {
        return;
    }
    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-12.0, -12.0])
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            for toast in &state.toasts {
                let accent = match toast.level {
                    ToastLevel::Info => color::SUCCESS,
                    ToastLevel::Error => color::DESTRUCTIVE,
                };
                egui::Frame::popup(ui.style())
                    .stroke(egui::Stroke::new(1.5, accent))
                    .show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.label(RichText::new(&toast.message).color(accent));
                    });
                ui.add_space(4.0);
            }
        });
}
