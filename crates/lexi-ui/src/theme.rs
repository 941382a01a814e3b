//! UI theme constants

use egui::{Color32, CornerRadius, Stroke, Vec2};

/// Colors for one theme variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub dark: bool,
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_surface: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub accent: Color32,
    pub success: Color32,
    pub error: Color32,
    pub warning: Color32,
    pub code_bg: Color32,
}

pub const DARK: Palette = Palette {
    dark: true,
    bg_primary: Color32::from_rgb(24, 24, 27),
    bg_secondary: Color32::from_rgb(39, 39, 42),
    bg_surface: Color32::from_rgb(52, 52, 56),
    text_primary: Color32::from_rgb(228, 228, 231),
    text_secondary: Color32::from_rgb(161, 161, 170),
    accent: Color32::from_rgb(99, 102, 241),
    success: Color32::from_rgb(34, 197, 94),
    error: Color32::from_rgb(239, 68, 68),
    warning: Color32::from_rgb(234, 179, 8),
    code_bg: Color32::from_rgb(63, 63, 70),
};

pub const LIGHT: Palette = Palette {
    dark: false,
    bg_primary: Color32::from_rgb(250, 250, 250),
    bg_secondary: Color32::from_rgb(244, 244, 245),
    bg_surface: Color32::from_rgb(228, 228, 231),
    text_primary: Color32::from_rgb(24, 24, 27),
    text_secondary: Color32::from_rgb(82, 82, 91),
    accent: Color32::from_rgb(79, 70, 229),
    success: Color32::from_rgb(22, 163, 74),
    error: Color32::from_rgb(220, 38, 38),
    warning: Color32::from_rgb(202, 138, 4),
    code_bg: Color32::from_rgb(240, 240, 240),
};

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(6);
pub const PANEL_PADDING: Vec2 = Vec2::new(12.0, 8.0);

pub fn palette(dark_mode: bool) -> Palette {
    if dark_mode {
        DARK
    } else {
        LIGHT
    }
}

/// Apply the dark or light theme to an egui context
pub fn apply_theme(ctx: &egui::Context, dark_mode: bool) {
    let p = palette(dark_mode);
    let mut style = (*ctx.style()).clone();

    style.visuals = if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    style.visuals.panel_fill = p.bg_primary;
    style.visuals.window_fill = p.bg_secondary;
    style.visuals.extreme_bg_color = p.bg_secondary;
    style.visuals.override_text_color = Some(p.text_primary);

    style.visuals.widgets.inactive.bg_fill = p.bg_surface;
    style.visuals.widgets.inactive.weak_bg_fill = p.bg_surface;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, p.text_secondary);
    style.visuals.widgets.hovered.bg_fill = p.bg_surface;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, p.text_primary);
    style.visuals.widgets.active.bg_fill = p.accent;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, p.text_primary);

    style.visuals.selection.bg_fill = p.accent.linear_multiply(0.4);
    style.visuals.selection.stroke = Stroke::new(1.0, p.accent);

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);

    ctx.set_style(style);
}
