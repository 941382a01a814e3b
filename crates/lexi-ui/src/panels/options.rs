//! Options panel: Gemini API key, model, and the two preferences,
//! with an explicit Save button and visual feedback.

use egui::{self, RichText, Vec2};
use lexi_types::config::{model_label, Settings, GEMINI_MODELS};
use crate::state::SaveFeedback;
use crate::theme::*;

/// What the caller should do after rendering the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    /// Nothing changed
    None,
    /// A field was edited (not yet saved)
    Changed,
    /// The user clicked the explicit Save button
    SaveClicked,
}

/// Render the settings panel. Returns an action for the caller to handle.
pub fn settings_panel(
    ui: &mut egui::Ui,
    settings: &mut Settings,
    save_feedback: Option<&SaveFeedback>,
) -> SettingsAction {
    let p = palette(settings.dark_mode);
    let mut changed = false;
    let mut save_clicked = false;

    egui::Frame::default()
        .fill(p.bg_secondary)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(p.text_primary));
            ui.separator();

            // ── Gemini Section ───────────────────────────────
            ui.label(RichText::new("Gemini").color(p.accent).strong());
            ui.add_space(2.0);

            // API Key (masked)
            ui.label(RichText::new("API Key").color(p.text_secondary).small());
            let api_key_edit = egui::TextEdit::singleline(&mut settings.api_key)
                .password(true)
                .hint_text("AIza...");
            if ui.add(api_key_edit).changed() {
                changed = true;
            }

            ui.add_space(4.0);

            // Model
            ui.label(RichText::new("Model").color(p.text_secondary).small());
            egui::ComboBox::from_id_salt("gemini_model")
                .selected_text(model_label(settings.model_or_default()).to_string())
                .show_ui(ui, |ui| {
                    for model in GEMINI_MODELS {
                        if ui
                            .selectable_value(&mut settings.model, model.id.to_string(), model.label)
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Preferences Section ──────────────────────────
            ui.label(RichText::new("Preferences").color(p.accent).strong());
            ui.add_space(2.0);

            if ui
                .checkbox(&mut settings.auto_lookup, "Look up selected text automatically")
                .changed()
            {
                changed = true;
            }
            if ui.checkbox(&mut settings.dark_mode, "Dark mode").changed() {
                changed = true;
            }

            // ── Save Button ──────────────────────────────────
            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn = ui.add(
                    egui::Button::new(
                        RichText::new("Save Settings")
                            .color(egui::Color32::WHITE)
                            .strong(),
                    )
                    .fill(p.accent)
                    .corner_radius(PANEL_ROUNDING)
                    .min_size(Vec2::new(120.0, 28.0)),
                );
                if btn.clicked() {
                    save_clicked = true;
                }

                if let Some(fb) = save_feedback {
                    let color = if fb.success { p.success } else { p.error };
                    ui.label(RichText::new(&fb.message).color(color).small());
                }
            });
        });

    if save_clicked {
        SettingsAction::SaveClicked
    } else if changed {
        SettingsAction::Changed
    } else {
        SettingsAction::None
    }
}

/// Trim what the form collected before it is persisted
pub fn normalize(settings: &Settings) -> Settings {
    Settings {
        api_key: settings.api_key.trim().to_string(),
        model: settings.model_or_default().to_string(),
        ..settings.clone()
    }
}
