//! Catalog tab UI rendering

use eframe::egui::{self, RichText};

use crate::api::CatalogBackend;
use crate::controller::{Controller, UiEvent};
use crate::query::PAGE_SIZE_CHOICES;
use crate::view::ListView;

use super::Theme;
use super::components::{pagination_bar, section_frame, status_banner};

/// Render the catalog tab: filters, summary, rows and pagination
pub fn render_catalog_tab<B: CatalogBackend>(
    ui: &mut egui::Ui,
    ctl: &Controller<B>,
    theme: &Theme,
    consoles: &[String],
    events: &mut Vec<UiEvent>,
) {
    let msgs = ctl.messages();

    section_frame(ui, theme, "Catalog", |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Filter:").color(theme.text_muted));
            let mut filter = ctl.catalog.filter_input.clone();
            let response = ui.add(
                egui::TextEdit::singleline(&mut filter)
                    .hint_text("Game name")
                    .desired_width(220.0),
            );
            if response.changed() {
                events.push(UiEvent::FilterInput(filter));
            }

            ui.add_space(12.0);
            ui.label(RichText::new(format!("{}:", msgs.consoles)).color(theme.text_muted));
            let current = ctl.catalog.query().console.clone();
            let selected_text = if current.is_empty() { "All".to_string() } else { current.clone() };
            egui::ComboBox::from_id_salt("console_select")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    if ui.selectable_label(current.is_empty(), "All").clicked() && !current.is_empty() {
                        events.push(UiEvent::ConsoleSelected(String::new()));
                    }
                    for console in consoles {
                        if ui.selectable_label(&current == console, console).clicked() && &current != console {
                            events.push(UiEvent::ConsoleSelected(console.clone()));
                        }
                    }
                });

            ui.add_space(12.0);
            let page_size = ctl.catalog.query().page_size();
            egui::ComboBox::from_id_salt("page_size_select")
                .selected_text(format!("{} / page", page_size))
                .show_ui(ui, |ui| {
                    for &size in PAGE_SIZE_CHOICES {
                        if ui.selectable_label(size == page_size, size.to_string()).clicked() && size != page_size {
                            events.push(UiEvent::PageSizeSelected(size));
                        }
                    }
                });
        });
    });

    ui.add_space(12.0);
    if ctl.download.status.is_visible() {
        status_banner(ui, theme, &ctl.download.status);
        ui.add_space(8.0);
    }

    match &ctl.catalog.view {
        ListView::Idle => {}
        ListView::Loading => {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.spinner();
            });
        }
        ListView::Failed { message } => {
            ui.colored_label(theme.error, format!("⚠ {}", message));
        }
        ListView::Empty { summary } => {
            ui.label(RichText::new(summary).color(theme.text_secondary));
            ui.add_space(8.0);
            ui.label(RichText::new(msgs.no_results).color(theme.text_muted).italics());
        }
        ListView::Rows {
            summary,
            rows,
            pagination,
        } => {
            ui.horizontal(|ui| {
                ui.label(RichText::new(summary).color(theme.text_secondary));
                if ctl.catalog.is_loading() {
                    ui.spinner();
                }
            });
            ui.add_space(8.0);

            egui::Grid::new("catalog_rows")
                .num_columns(4)
                .striped(true)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Name").strong());
                    ui.label(RichText::new(msgs.consoles).strong());
                    ui.label(RichText::new(msgs.versions).strong());
                    ui.label(RichText::new(msgs.action).strong());
                    ui.end_row();

                    for (i, row) in rows.iter().enumerate() {
                        ui.label(RichText::new(&row.name).color(theme.text_primary));
                        ui.label(RichText::new(&row.consoles).color(theme.text_muted));
                        ui.label(msgs.versions_badge(row.versions));
                        if ui.button(msgs.versions).clicked() {
                            events.push(UiEvent::RowActivated(i));
                        }
                        ui.end_row();
                    }
                });

            ui.add_space(12.0);
            if let Some(page) = pagination_bar(ui, theme, msgs, pagination) {
                events.push(UiEvent::PageClicked(page));
            }
        }
    }

    if ctl.show_scroll_top() {
        ui.add_space(12.0);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
            if ui.button("⬆ Top").clicked() {
                events.push(UiEvent::ScrollTopClicked);
            }
        });
    }
}
