use std::time::{Duration, Instant};

use eframe::egui;

use crate::api::CatalogClient;
use crate::config::Config;
use crate::controller::{Controller, ControllerOptions, Key, UiEvent};
use crate::state::StateEvent;
use crate::ui::{self, Theme};

/// Repaint interval while a request is in flight
const BUSY_REPAINT: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Tab {
    #[default]
    Catalog,
    Search,
}

/// Main application state
pub struct RetroApp {
    controller: Controller<CatalogClient>,
    theme: Theme,
    active_tab: Tab,
    /// Consoles offered by the console selector
    consoles: Vec<String>,
    /// Hash field contents, submitted on Enter or Download
    hash_draft: String,
    /// Set when the controller asked to scroll back to the top
    scroll_to_top: bool,
    /// Last offset reported to the controller
    scroll_offset: f32,
}

impl RetroApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &Config, client: CatalogClient) -> Self {
        let theme = Theme::for_mode(config.ui.dark_theme);
        theme.apply(&cc.egui_ctx);

        let mut controller = Controller::new(client, ControllerOptions::from_config(config));
        controller.start();
        tracing::info!("Catalog client ready for {}", config.server.base_url);

        Self {
            controller,
            theme,
            active_tab: Tab::default(),
            consoles: config.catalog.consoles.clone(),
            hash_draft: String::new(),
            scroll_to_top: false,
            scroll_offset: 0.0,
        }
    }

    /// Perform side effects queued by the controller
    fn apply_state_events(&mut self) {
        for event in self.controller.take_events() {
            match event {
                StateEvent::Navigate(url) | StateEvent::OpenUrl(url) => {
                    tracing::info!("Opening {}", url);
                    if let Err(e) = open::that(&url) {
                        tracing::error!("Failed to open {}: {}", url, e);
                    }
                }
                StateEvent::ScrollToTop => self.scroll_to_top = true,
            }
        }
    }

    fn render_tab_bar(&self, ui: &mut egui::Ui) -> Option<Tab> {
        let mut selected = None;
        ui.horizontal(|ui| {
            for (tab, label) in [(Tab::Catalog, "Catalog"), (Tab::Search, "Search")] {
                if ui.selectable_label(self.active_tab == tab, label).clicked() {
                    selected = Some(tab);
                }
            }
            if self.controller.is_busy() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.spinner();
                });
            }
        });
        selected
    }
}

impl eframe::App for RetroApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let mut events = Vec::new();

        if ui::escape_pressed(ctx) {
            events.push(UiEvent::KeyPressed(Key::Escape));
        }

        // Poll async tasks
        self.controller.poll(now);
        self.apply_state_events();

        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            if let Some(tab) = self.render_tab_bar(ui) {
                self.active_tab = tab;
            }
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut scroll = egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .enable_scrolling(!self.controller.scroll_locked());
            if std::mem::take(&mut self.scroll_to_top) {
                scroll = scroll.vertical_scroll_offset(0.0);
            }

            let output = scroll.show(ui, |ui| match self.active_tab {
                Tab::Catalog => {
                    ui::render_catalog_tab(ui, &self.controller, &self.theme, &self.consoles, &mut events)
                }
                Tab::Search => {
                    ui::render_search_tab(ui, &self.controller, &self.theme, &mut self.hash_draft, &mut events)
                }
            });

            let offset = output.state.offset.y;
            if (offset - self.scroll_offset).abs() >= 1.0 {
                self.scroll_offset = offset;
                events.push(UiEvent::Scrolled(offset));
            }
        });

        ui::versions_modal(ctx, &self.controller, &self.theme, &mut events);
        ui::instructions_modal(ctx, &self.controller, &self.theme, &mut events);

        let had_events = !events.is_empty();
        for event in events {
            self.controller.handle(event, now);
        }
        if had_events {
            self.apply_state_events();
            ctx.request_repaint();
        }

        if self.controller.is_busy() {
            ctx.request_repaint_after(BUSY_REPAINT);
        }
        if let Some(deadline) = self.controller.next_wakeup() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }
}
