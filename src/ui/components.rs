//! Shared UI components

use eframe::egui::{self, Color32, CornerRadius, Margin, RichText, Sense};

use crate::api::CatalogBackend;
use crate::controller::{Controller, UiEvent};
use crate::messages::Messages;
use crate::modal::ModalId;
use crate::view::{PageControl, PaginationView, StatusKind, StatusView, VersionsBody};

use super::Theme;

/// A titled panel with the theme's card styling
pub fn section_frame<R>(ui: &mut egui::Ui, theme: &Theme, title: &str, content: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::new()
        .fill(theme.bg_medium)
        .corner_radius(CornerRadius::same(8))
        .inner_margin(Margin::same(16))
        .stroke(egui::Stroke::new(1.0, theme.border))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).color(theme.accent).size(13.0).strong());
            ui.add_space(12.0);
            content(ui)
        })
        .inner
}

/// Small colored tag
pub fn badge(ui: &mut egui::Ui, text: &str, color: Color32) {
    egui::Frame::new()
        .fill(color.gamma_multiply(0.2))
        .corner_radius(CornerRadius::same(4))
        .inner_margin(Margin::symmetric(6, 1))
        .show(ui, |ui| {
            ui.label(RichText::new(text).color(color).size(11.0));
        });
}

/// First, previous, "page X of Y", next, last. Returns the page clicked, if any.
pub fn pagination_bar(ui: &mut egui::Ui, theme: &Theme, msgs: &Messages, view: &PaginationView) -> Option<u32> {
    let mut clicked = None;
    let mut button = |ui: &mut egui::Ui, control: PageControl| {
        let b = view.button(control);
        if ui
            .add_enabled(!b.disabled, egui::Button::new(control.label(msgs)))
            .clicked()
        {
            clicked = Some(b.target);
        }
    };

    ui.horizontal(|ui| {
        button(ui, PageControl::First);
        button(ui, PageControl::Previous);
        ui.label(RichText::new(view.label(msgs)).color(theme.text_secondary));
        button(ui, PageControl::Next);
        button(ui, PageControl::Last);
    });

    clicked
}

/// Status banner with its spinner; nothing is drawn when hidden
pub fn status_banner(ui: &mut egui::Ui, theme: &Theme, status: &StatusView) {
    if !status.is_visible() {
        return;
    }

    let color = match status.kind {
        StatusKind::Info => theme.info,
        StatusKind::Success => theme.success,
        StatusKind::Error => theme.error,
    };

    egui::Frame::new()
        .fill(color.gamma_multiply(0.15))
        .corner_radius(CornerRadius::same(6))
        .inner_margin(Margin::same(12))
        .stroke(egui::Stroke::new(1.0, color))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                if status.spinner {
                    ui.spinner();
                }
                ui.label(RichText::new(&status.message).color(color));
            });
        });
}

/// Versions modal. Picks, page changes and close requests become events.
pub fn versions_modal<B: CatalogBackend>(
    ctx: &egui::Context,
    ctl: &Controller<B>,
    theme: &Theme,
    events: &mut Vec<UiEvent>,
) {
    if !ctl.modals.is_open(ModalId::Versions) {
        return;
    }
    let Some(view) = ctl.versions.view() else {
        return;
    };
    let msgs = ctl.messages();

    let response = egui::Modal::new(egui::Id::new(ModalId::Versions.dom_id())).show(ctx, |ui| {
        ui.set_width(520.0);
        ui.horizontal(|ui| {
            ui.heading(RichText::new(view.heading(msgs)).color(theme.text_primary));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("✕").clicked() {
                    events.push(UiEvent::CloseModal(ModalId::Versions));
                }
            });
        });
        ui.separator();

        match &view.body {
            VersionsBody::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);
                    ui.spinner();
                    ui.label(RichText::new(msgs.loading_versions).color(theme.text_muted));
                    ui.add_space(24.0);
                });
            }
            VersionsBody::Error(message) => {
                ui.add_space(12.0);
                ui.colored_label(theme.error, format!("⚠ {}", message));
                ui.add_space(12.0);
            }
            VersionsBody::Cards { cards, pagination } => {
                egui::ScrollArea::vertical().max_height(420.0).show(ui, |ui| {
                    for card in cards {
                        let (fill, stroke) = if card.recommended {
                            (theme.recommended_fill, theme.success)
                        } else {
                            (theme.bg_light, theme.border)
                        };
                        let frame = egui::Frame::new()
                            .fill(fill)
                            .corner_radius(CornerRadius::same(6))
                            .inner_margin(Margin::same(10))
                            .stroke(egui::Stroke::new(1.0, stroke))
                            .show(ui, |ui| {
                                ui.set_width(ui.available_width());
                                ui.horizontal(|ui| {
                                    ui.label(RichText::new(&card.title).color(theme.text_primary).strong());
                                    if card.recommended {
                                        badge(ui, &format!("✅ {}", msgs.recommended), theme.success);
                                    }
                                });
                                ui.horizontal_wrapped(|ui| {
                                    if let Some(region) = &card.region {
                                        badge(ui, region, theme.success);
                                    }
                                    if card.is_hack {
                                        badge(ui, msgs.hack, theme.warning);
                                    }
                                    if card.is_translation {
                                        badge(ui, msgs.translation, theme.warning);
                                    }
                                });
                                ui.label(
                                    RichText::new(format!("Hash: {}", card.hash))
                                        .color(theme.text_muted)
                                        .size(11.0),
                                );
                            });
                        if frame.response.interact(Sense::click()).clicked() {
                            events.push(UiEvent::VersionPicked(card.index));
                        }
                        ui.add_space(6.0);
                    }
                });
                ui.add_space(8.0);
                if let Some(page) = pagination_bar(ui, theme, msgs, pagination) {
                    events.push(UiEvent::VersionsPageClicked(page));
                }
            }
        }
    });

    if response.should_close() && !escape_pressed(ctx) {
        events.push(UiEvent::BackdropClicked(ModalId::Versions));
    }
}

/// Static usage instructions
pub fn instructions_modal<B: CatalogBackend>(
    ctx: &egui::Context,
    ctl: &Controller<B>,
    theme: &Theme,
    events: &mut Vec<UiEvent>,
) {
    if !ctl.modals.is_open(ModalId::Instructions) {
        return;
    }

    let response = egui::Modal::new(egui::Id::new(ModalId::Instructions.dom_id())).show(ctx, |ui| {
        ui.set_width(440.0);
        ui.heading(RichText::new("How to download").color(theme.text_primary));
        ui.separator();
        for (i, step) in [
            "Browse the catalog, or switch to Search and type at least two letters of a name.",
            "Open a game to see its versions. The recommended one is listed first.",
            "Click a version to start the download in your browser.",
            "If you already know the content hash, use hash mode to download it directly.",
        ]
        .iter()
        .enumerate()
        {
            ui.label(RichText::new(format!("{}. {}", i + 1, step)).color(theme.text_secondary));
        }
        ui.add_space(8.0);
        if ui.button("Close").clicked() {
            events.push(UiEvent::CloseModal(ModalId::Instructions));
        }
    });

    if response.should_close() && !escape_pressed(ctx) {
        events.push(UiEvent::BackdropClicked(ModalId::Instructions));
    }
}

/// Escape is routed to the controller separately, which closes every modal
pub fn escape_pressed(ctx: &egui::Context) -> bool {
    ctx.input(|i| i.key_pressed(egui::Key::Escape))
}
