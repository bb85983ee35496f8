use super::Field;
use crate::link::LinkWriter;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

/// System: small egui window with link and game status.
pub fn status_hud(mut contexts: EguiContexts, field: Res<Field>) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    let controller = &field.0;
    let link = controller.link();

    egui::Window::new("Blaster")
        .resizable(false)
        .collapsible(true)
        .default_pos([8.0, 8.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Link:");
                match link.port_name() {
                    Some(name) if link.is_open() => {
                        ui.label(egui::RichText::new(name).color(egui::Color32::GREEN).strong());
                    }
                    _ => {
                        ui.label(egui::RichText::new("none").color(egui::Color32::ORANGE));
                    }
                }
            });
            ui.label(format!("State: {}", controller.transmission()));
            match controller.pending_click() {
                Some(point) => ui.label(format!("Last click: {point}")),
                None => ui.label("Last click: -"),
            };
            ui.separator();
            ui.label(format!("Hornets: {}", controller.registry().len()));
            ui.label(format!("Spawned: {}", controller.next_id()));
        });
}
