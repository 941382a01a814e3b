//! Chat history panel: newest-first conversation list with one
//! expandable transcript and a confirmed "clear all".

use egui::{self, RichText, ScrollArea};
use lexi_types::conversation::Conversation;
use crate::state::{format_timestamp, role_label, OptionsUiState};
use crate::theme::*;

const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    None,
    /// The user confirmed clearing all history
    Clear,
    Refresh,
}

pub fn history_panel(ui: &mut egui::Ui, state: &mut OptionsUiState) -> HistoryAction {
    let p = palette(state.settings.dark_mode);
    let mut action = HistoryAction::None;

    egui::Frame::default()
        .fill(p.bg_secondary)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading(RichText::new("Chat History").color(p.text_primary));
                ui.label(RichText::new(state.history_count_label()).color(p.text_secondary).small());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Clear All").clicked() {
                        state.confirm_clear = true;
                    }
                    if ui.button("Refresh").clicked() {
                        action = HistoryAction::Refresh;
                    }
                });
            });

            if state.confirm_clear {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Clear all chat history? This cannot be undone.")
                            .color(p.warning),
                    );
                    if ui.button("Yes, clear").clicked() {
                        state.confirm_clear = false;
                        action = HistoryAction::Clear;
                    }
                    if ui.button("Cancel").clicked() {
                        state.confirm_clear = false;
                    }
                });
            }

            ui.separator();

            if state.history.is_empty() {
                ui.label(
                    RichText::new(
                        "No conversations yet. Start by selecting text and using \"Explain with AI\".",
                    )
                    .color(p.text_secondary)
                    .italics(),
                );
                return;
            }

            let mut clicked = None;
            ScrollArea::vertical().show(ui, |ui| {
                for chat in &state.history {
                    let expanded = state.expanded.as_deref() == Some(chat.id.as_str());
                    if chat_item(ui, chat, expanded, &p) {
                        clicked = Some(chat.id.clone());
                    }
                    ui.add_space(4.0);
                }
            });
            if let Some(id) = clicked {
                state.toggle_expanded(&id);
            }
        });

    action
}

/// One conversation card. Returns true when its header was clicked.
fn chat_item(ui: &mut egui::Ui, chat: &Conversation, expanded: bool, p: &Palette) -> bool {
    let preview = chat
        .preview(PREVIEW_CHARS)
        .unwrap_or_else(|| "No content available".to_string());

    let inner = egui::Frame::default()
        .fill(p.bg_surface)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            let header = ui
                .vertical(|ui| {
                    ui.label(RichText::new(&chat.title).color(p.text_primary).strong());
                    ui.label(RichText::new(format_timestamp(chat.timestamp)).color(p.text_secondary).small());
                    if !expanded {
                        ui.label(RichText::new(&preview).color(p.text_secondary));
                    }
                })
                .response
                .interact(egui::Sense::click());

            if expanded {
                ui.separator();
                if chat.context.is_empty() {
                    ui.label(RichText::new("No conversation data available.").color(p.text_secondary));
                }
                for turn in &chat.context {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(RichText::new(role_label(turn.role)).color(p.accent).strong());
                        ui.label(RichText::new(&turn.content).color(p.text_primary));
                    });
                }
            }
            header.clicked()
        });
    inner.inner
}
