//! Popup panel: word input, lookup/explain buttons, result area,
//! follow-up row and the two quick toggles.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use crate::markdown::show_blocks;
use crate::state::{PopupUiState, ResultView};
use crate::theme::*;

/// What the caller should do after rendering the popup
#[derive(Debug, Clone, PartialEq)]
pub enum PopupAction {
    None,
    Lookup(String),
    Explain(String),
    FollowUp(String),
    SetDarkMode(bool),
    SetAutoLookup(bool),
    OpenOptions,
    OpenHistory,
}

/// Render the popup. Returns at most one action per frame.
pub fn popup_panel(ui: &mut egui::Ui, state: &mut PopupUiState) -> PopupAction {
    let p = palette(state.dark_mode);
    let mut action = PopupAction::None;

    egui::Frame::default()
        .fill(p.bg_primary)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            // Header
            ui.horizontal(|ui| {
                ui.heading(RichText::new("Lexi").color(p.text_primary).strong());
                if state.background_alive == Some(false) {
                    ui.label(RichText::new("offline").color(p.warning).small());
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let icon = if state.dark_mode { "☀" } else { "🌙" };
                    if ui
                        .add(egui::Button::new(RichText::new(icon).size(16.0)).frame(false))
                        .on_hover_text("Toggle Dark Mode")
                        .clicked()
                    {
                        state.dark_mode = !state.dark_mode;
                        action = PopupAction::SetDarkMode(state.dark_mode);
                    }
                });
            });

            ui.separator();

            // Input row
            let input = egui::TextEdit::singleline(&mut state.input_text)
                .hint_text("Word or phrase")
                .desired_width(ui.available_width())
                .char_limit(lexi_core::page::MAX_SELECTION_CHARS);
            let response = ui.add(input);
            let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            ui.horizontal(|ui| {
                let enabled = !state.busy && !state.input_text.trim().is_empty();
                if ui.add_enabled(enabled, action_button("Lookup", &p)).clicked() || (enter && enabled) {
                    action = PopupAction::Lookup(state.input_text.trim().to_string());
                }
                if ui.add_enabled(enabled, action_button("Explain with AI", &p)).clicked() {
                    action = PopupAction::Explain(state.input_text.trim().to_string());
                }
                if state.follow_up_enabled
                    && ui.add_enabled(!state.busy, action_button("Follow-up", &p)).clicked()
                {
                    state.show_follow_up = true;
                }
            });

            if state.show_follow_up {
                if let Some(question) = follow_up_row(ui, state, &p) {
                    action = PopupAction::FollowUp(question);
                }
            }

            ui.add_space(6.0);

            // Result area
            egui::Frame::default()
                .fill(p.bg_secondary)
                .corner_radius(PANEL_ROUNDING)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                        show_result(ui, &state.result, &p);
                    });
                });

            ui.add_space(6.0);
            ui.separator();

            // Footer
            ui.horizontal(|ui| {
                if ui.checkbox(&mut state.auto_lookup, "Auto lookup on select").changed() {
                    action = PopupAction::SetAutoLookup(state.auto_lookup);
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.link("Options").clicked() {
                        action = PopupAction::OpenOptions;
                    }
                    if ui.link("History").clicked() {
                        action = PopupAction::OpenHistory;
                    }
                });
            });
        });

    action
}

fn follow_up_row(ui: &mut egui::Ui, state: &mut PopupUiState, p: &Palette) -> Option<String> {
    let mut submitted = None;
    ui.horizontal(|ui| {
        let input = egui::TextEdit::singleline(&mut state.follow_up_text)
            .hint_text("Ask a follow-up question...")
            .desired_width(ui.available_width() - 120.0);
        let response = ui.add(input);
        let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if ui.add(action_button("Send", p)).clicked() || enter {
            submitted = state.take_follow_up();
        }
        if ui.button("Cancel").clicked() {
            state.cancel_follow_up();
        }
    });
    submitted
}

fn show_result(ui: &mut egui::Ui, result: &ResultView, p: &Palette) {
    match result {
        ResultView::Empty => {
            ui.label(
                RichText::new("Select text on a page or type a word above.")
                    .color(p.text_secondary)
                    .italics(),
            );
        }
        ResultView::Status(status) => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new(status).color(p.text_secondary));
            });
        }
        ResultView::Plain(text) => {
            ui.label(RichText::new(text).color(p.text_primary));
        }
        ResultView::Markdown(blocks) => show_blocks(ui, blocks, p),
        ResultView::Error(message) => {
            ui.label(RichText::new(message).color(p.error));
        }
    }
}

fn action_button<'a>(label: &'a str, p: &Palette) -> egui::Button<'a> {
    egui::Button::new(RichText::new(label).color(egui::Color32::WHITE))
        .fill(p.accent)
        .corner_radius(PANEL_ROUNDING)
        .min_size(Vec2::new(60.0, 24.0))
}
