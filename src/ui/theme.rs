use eframe::egui::{self, Color32, Stroke, Visuals};

/// Theme color definitions
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub bg_darkest: Color32,
    pub bg_dark: Color32,
    pub bg_medium: Color32,
    pub bg_light: Color32,

    // Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    // Accent colors
    pub accent: Color32,
    pub accent_hover: Color32,
    pub accent_muted: Color32,

    // Semantic colors
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,
    pub info: Color32,

    pub border: Color32,
    pub selection: Color32,
    /// Highlight behind the recommended version
    pub recommended_fill: Color32,

    dark: bool,
}

impl Theme {
    pub fn for_mode(dark: bool) -> Self {
        if dark { Self::dark() } else { Self::light() }
    }

    /// Dark slate with an indigo accent
    pub fn dark() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(11, 15, 25),
            bg_dark: Color32::from_rgb(17, 24, 39),   // Gray-900
            bg_medium: Color32::from_rgb(31, 41, 55), // Gray-800
            bg_light: Color32::from_rgb(55, 65, 81),  // Gray-700

            text_primary: Color32::from_rgb(243, 244, 246),
            text_secondary: Color32::from_rgb(209, 213, 219),
            text_muted: Color32::from_rgb(156, 163, 175),

            accent: Color32::from_rgb(99, 102, 241),        // Indigo-500
            accent_hover: Color32::from_rgb(129, 140, 248), // Indigo-400
            accent_muted: Color32::from_rgb(67, 56, 202),   // Indigo-700

            success: Color32::from_rgb(34, 197, 94),
            warning: Color32::from_rgb(234, 179, 8),
            error: Color32::from_rgb(239, 68, 68),
            info: Color32::from_rgb(59, 130, 246),

            border: Color32::from_rgb(75, 85, 99),
            selection: Color32::from_rgb(99, 102, 241).gamma_multiply(0.3),
            recommended_fill: Color32::from_rgb(20, 83, 45),

            dark: true,
        }
    }

    /// Light gray with the same accent, close to the catalog site
    pub fn light() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(229, 231, 235),
            bg_dark: Color32::from_rgb(243, 244, 246),
            bg_medium: Color32::from_rgb(255, 255, 255),
            bg_light: Color32::from_rgb(249, 250, 251),

            text_primary: Color32::from_rgb(31, 41, 55),
            text_secondary: Color32::from_rgb(75, 85, 99),
            text_muted: Color32::from_rgb(107, 114, 128),

            accent: Color32::from_rgb(79, 70, 229),         // Indigo-600
            accent_hover: Color32::from_rgb(99, 102, 241),  // Indigo-500
            accent_muted: Color32::from_rgb(165, 180, 252), // Indigo-300

            success: Color32::from_rgb(22, 163, 74),
            warning: Color32::from_rgb(202, 138, 4),
            error: Color32::from_rgb(220, 38, 38),
            info: Color32::from_rgb(37, 99, 235),

            border: Color32::from_rgb(229, 231, 235),
            selection: Color32::from_rgb(79, 70, 229).gamma_multiply(0.2),
            recommended_fill: Color32::from_rgb(240, 253, 244),

            dark: false,
        }
    }

    /// Apply this theme to egui's visuals
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = if self.dark { Visuals::dark() } else { Visuals::light() };

        // Window and panel backgrounds
        visuals.window_fill = self.bg_medium;
        visuals.panel_fill = self.bg_dark;
        visuals.faint_bg_color = self.bg_light;
        visuals.extreme_bg_color = self.bg_darkest;

        visuals.widgets.noninteractive.bg_fill = self.bg_medium;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.inactive.weak_bg_fill = self.bg_light;
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.hovered.weak_bg_fill = self.bg_light;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent);

        visuals.widgets.active.weak_bg_fill = self.accent_muted;
        visuals.widgets.active.bg_stroke = Stroke::new(1.0, self.accent_hover);

        visuals.selection.bg_fill = self.selection;
        visuals.selection.stroke = Stroke::new(1.0, self.accent);
        visuals.hyperlink_color = self.accent;

        visuals.window_stroke = Stroke::new(1.0, self.border);

        ctx.set_visuals(visuals);
    }
}
