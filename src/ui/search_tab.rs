//! Search tab UI rendering

use eframe::egui::{self, CornerRadius, Margin, RichText, Sense};

use crate::api::CatalogBackend;
use crate::controller::{Controller, UiEvent};
use crate::modal::ModalId;
use crate::state::SearchMode;
use crate::view::ResultsView;

use super::Theme;
use super::components::{badge, section_frame, status_banner};

/// Render the search tab. `hash_draft` holds the hash field between frames.
pub fn render_search_tab<B: CatalogBackend>(
    ui: &mut egui::Ui,
    ctl: &Controller<B>,
    theme: &Theme,
    hash_draft: &mut String,
    events: &mut Vec<UiEvent>,
) {
    let msgs = ctl.messages();

    section_frame(ui, theme, "Search", |ui| {
        ui.horizontal(|ui| {
            let mode = ctl.search.mode;
            if ui.selectable_label(mode == SearchMode::Name, "By name").clicked() && mode != SearchMode::Name {
                events.push(UiEvent::SearchModeSelected(SearchMode::Name));
            }
            if ui.selectable_label(mode == SearchMode::Hash, "By hash").clicked() && mode != SearchMode::Hash {
                events.push(UiEvent::SearchModeSelected(SearchMode::Hash));
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("❓ Instructions").clicked() {
                    events.push(UiEvent::OpenModal(ModalId::Instructions));
                }
            });
        });
        ui.add_space(8.0);

        match ctl.search.mode {
            SearchMode::Name => render_name_search(ui, ctl, theme, events),
            SearchMode::Hash => {
                ui.horizontal(|ui| {
                    let response = ui.add(
                        egui::TextEdit::singleline(hash_draft)
                            .hint_text("Content hash")
                            .desired_width(320.0),
                    );
                    let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    let busy = ctl.download.is_busy();
                    if (ui.add_enabled(!busy, egui::Button::new("Download")).clicked() || entered) && !busy {
                        events.push(UiEvent::HashSubmitted(hash_draft.clone()));
                    }
                });
            }
        }
    });

    ui.add_space(12.0);
    status_banner(ui, theme, &ctl.download.status);

    if ctl.search.is_searching() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(RichText::new(msgs.searching).color(theme.text_muted));
        });
    }
}

fn render_name_search<B: CatalogBackend>(
    ui: &mut egui::Ui,
    ctl: &Controller<B>,
    theme: &Theme,
    events: &mut Vec<UiEvent>,
) {
    let msgs = ctl.messages();

    let area = ui.vertical(|ui| {
        let mut name = ctl.search.name_input.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut name)
                .hint_text("Game name")
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            events.push(UiEvent::NameInput(name));
        }

        match &ctl.search.results {
            ResultsView::Hidden => {}
            ResultsView::NoResults => {
                ui.label(RichText::new(msgs.no_results).color(theme.text_muted).italics());
            }
            ResultsView::Error => {
                ui.colored_label(theme.error, msgs.search_error);
            }
            ResultsView::Cards(cards) => {
                egui::Frame::new()
                    .fill(theme.bg_light)
                    .corner_radius(CornerRadius::same(6))
                    .inner_margin(Margin::same(6))
                    .show(ui, |ui| {
                        egui::ScrollArea::vertical().max_height(280.0).show(ui, |ui| {
                            for (i, card) in cards.iter().enumerate() {
                                let frame = egui::Frame::new()
                                    .inner_margin(Margin::same(6))
                                    .show(ui, |ui| {
                                        ui.set_width(ui.available_width());
                                        ui.horizontal(|ui| {
                                            ui.label(RichText::new(&card.name).color(theme.text_primary).strong());
                                            if let Some(versions) = card.versions_badge(msgs) {
                                                badge(ui, &versions, theme.info);
                                            }
                                            if let Some(region) = &card.region {
                                                badge(ui, region, theme.success);
                                            }
                                            if card.is_hack {
                                                badge(ui, msgs.hack, theme.warning);
                                            }
                                        });
                                        ui.label(
                                            RichText::new(card.hash_preview())
                                                .color(theme.text_muted)
                                                .size(11.0),
                                        );
                                    });
                                let response = frame.response.interact(Sense::click());
                                if response.hovered() {
                                    ui.painter().rect_stroke(
                                        response.rect,
                                        CornerRadius::same(4),
                                        egui::Stroke::new(1.0, theme.accent),
                                        egui::StrokeKind::Inside,
                                    );
                                }
                                if response.clicked() {
                                    events.push(UiEvent::ResultPicked(i));
                                }
                            }
                        });
                    });
            }
        }
    });

    if ctl.search.results.is_visible() && area.response.clicked_elsewhere() {
        events.push(UiEvent::ClickedOutsideSearch);
    }
}
