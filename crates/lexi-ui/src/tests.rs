#[cfg(test)]
mod tests {
    use crate::markdown::*;
    use crate::panels::options::{normalize, settings_panel, SettingsAction};
    use crate::panels::history::{history_panel, HistoryAction};
    use crate::panels::popup::{popup_panel, PopupAction};
    use crate::state::*;
    use crate::theme::{self, DARK, LIGHT};
    use lexi_core::markdown::{self as md, Block, Span};
    use lexi_types::config::Settings;
    use lexi_types::conversation::Conversation;
    use lexi_types::event::PopupEvent;
    use lexi_types::message::{Role, Turn};

    fn conversation(id: &str) -> Conversation {
        Conversation::new(
            id.to_string(),
            "photosynthesis",
            vec![Turn::user("Explain: photosynthesis"), Turn::assistant("Plants eat light.")],
        )
    }

    /// Run one headless egui frame over `body`
    fn frame<R>(mut body: impl FnMut(&mut egui::Ui) -> R) -> Option<R> {
        let ctx = egui::Context::default();
        let mut out = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                out = Some(body(ui));
            });
        });
        out
    }

    // ─── PopupUiState Tests ──────────────────────────────────

    #[test]
    fn test_popup_state_initial() {
        let state = PopupUiState::new();
        assert_eq!(state.result, ResultView::Empty);
        assert!(!state.busy);
        assert!(!state.follow_up_enabled);
        assert!(!state.show_follow_up);
        assert!(state.background_alive.is_none());
        assert!(state.dark_mode);
        assert!(state.auto_lookup);
    }

    #[test]
    fn test_popup_state_pending_then_definition() {
        let mut state = PopupUiState::new();
        state.process_events(vec![PopupEvent::Pending {
            status: "Looking up definition...".to_string(),
        }]);
        assert!(state.busy);
        assert_eq!(state.result, ResultView::Status("Looking up definition...".to_string()));

        state.process_events(vec![PopupEvent::Definition { text: "• cat".to_string() }]);
        assert!(!state.busy);
        assert_eq!(state.result, ResultView::Plain("• cat".to_string()));
    }

    #[test]
    fn test_popup_state_explanation_is_markdown() {
        let mut state = PopupUiState::new();
        state.process_events(vec![
            PopupEvent::Explanation { text: "**Light** in".to_string() },
            PopupEvent::FollowUpReady { chat_id: Some("chat_1".to_string()) },
        ]);
        assert_eq!(state.result, ResultView::Markdown(md::render("**Light** in")));
        assert!(state.follow_up_enabled);
    }

    #[test]
    fn test_popup_state_failure() {
        let mut state = PopupUiState::new();
        state.busy = true;
        state.process_events(vec![PopupEvent::Failed { message: "AI request failed.".to_string() }]);
        assert!(!state.busy);
        assert_eq!(state.result, ResultView::Error("AI request failed.".to_string()));
    }

    #[test]
    fn test_popup_state_prefill_does_not_clobber_typing() {
        let mut state = PopupUiState::new();
        state.process_events(vec![PopupEvent::SelectionPrefilled { text: "hello".to_string() }]);
        assert_eq!(state.input_text, "hello");

        state.input_text = "typed".to_string();
        state.process_events(vec![PopupEvent::SelectionPrefilled { text: "later".to_string() }]);
        assert_eq!(state.input_text, "typed");
    }

    #[test]
    fn test_popup_state_background_status() {
        let mut state = PopupUiState::new();
        state.process_events(vec![PopupEvent::BackgroundStatus { alive: false }]);
        assert_eq!(state.background_alive, Some(false));
    }

    #[test]
    fn test_take_follow_up() {
        let mut state = PopupUiState::new();
        state.show_follow_up = true;
        state.follow_up_text = "   ".to_string();
        assert!(state.take_follow_up().is_none());
        assert!(state.show_follow_up);

        state.follow_up_text = " why? ".to_string();
        assert_eq!(state.take_follow_up(), Some("why?".to_string()));
        assert!(state.follow_up_text.is_empty());
        assert!(!state.show_follow_up);
    }

    #[test]
    fn test_apply_settings() {
        let mut state = PopupUiState::new();
        state.apply_settings(&Settings {
            dark_mode: false,
            auto_lookup: false,
            ..Settings::default()
        });
        assert!(!state.dark_mode);
        assert!(!state.auto_lookup);
    }

    // ─── OptionsUiState Tests ────────────────────────────────

    #[test]
    fn test_toggle_expanded_single() {
        let mut state = OptionsUiState::new();
        state.toggle_expanded("a");
        assert_eq!(state.expanded.as_deref(), Some("a"));
        state.toggle_expanded("b");
        assert_eq!(state.expanded.as_deref(), Some("b"));
        state.toggle_expanded("b");
        assert!(state.expanded.is_none());
    }

    #[test]
    fn test_set_history_drops_stale_expansion() {
        let mut state = OptionsUiState::new();
        state.set_history(vec![conversation("a")]);
        state.toggle_expanded("a");
        state.set_history(Vec::new());
        assert!(state.expanded.is_none());
        assert_eq!(state.history_count_label(), "0 conversations");
    }

    #[test]
    fn test_history_count_label() {
        assert_eq!(history_count_label(1), "1 conversation");
        assert_eq!(history_count_label(2), "2 conversations");
    }

    #[test]
    fn test_role_label() {
        assert_eq!(role_label(Role::User), "You:");
        assert_eq!(role_label(Role::Assistant), "AI:");
    }

    #[test]
    fn test_format_timestamp() {
        assert!(!format_timestamp(1_700_000_000_000).is_empty());
        assert_eq!(format_timestamp(1_700_000_000_000).len(), "2023-11-14 22:13".len());
    }

    #[test]
    fn test_save_feedback() {
        assert!(SaveFeedback::saved().success);
        let failed = SaveFeedback::failed("quota exceeded");
        assert!(!failed.success);
        assert_eq!(failed.message, "Save failed: quota exceeded");
    }

    #[test]
    fn test_normalize_settings() {
        let settings = Settings {
            api_key: "  key  ".to_string(),
            model: String::new(),
            ..Settings::default()
        };
        let clean = normalize(&settings);
        assert_eq!(clean.api_key, "key");
        assert_eq!(clean.model, "gemini-2.5-flash");
    }

    // ─── Markdown Layout Tests ───────────────────────────────

    #[test]
    fn test_layout_job_text_matches_spans() {
        let spans = md::render_line("**bold** and *italic* and `code`");
        let job = layout_job(&spans, &DARK, 300.0);
        assert_eq!(job.text, "bold and italic and code");
        assert_eq!(job.sections.len(), 5);
        assert_eq!(job.wrap.max_width, 300.0);
    }

    #[test]
    fn test_span_formats() {
        assert!(span_format(&Span::Italic("x".to_string()), &DARK).italics);
        assert!(!span_format(&Span::Text("x".to_string()), &DARK).italics);
        assert_eq!(span_format(&Span::Bold("x".to_string()), &LIGHT).color, LIGHT.accent);
        let code = span_format(&Span::Code("x".to_string()), &LIGHT);
        assert_eq!(code.background, LIGHT.code_bg);
        assert_eq!(code.font_id.family, egui::FontFamily::Monospace);
    }

    #[test]
    fn test_markup_stays_literal() {
        let blocks = md::render("<b>hi</b>");
        let Block::Paragraph(spans) = &blocks[0] else {
            panic!("Expected paragraph");
        };
        let job = layout_job(spans, &DARK, 100.0);
        assert_eq!(job.text, "<b>hi</b>");
    }

    // ─── Theme Tests ─────────────────────────────────────────

    #[test]
    fn test_palette_selection() {
        assert!(theme::palette(true).dark);
        assert!(!theme::palette(false).dark);
        assert_ne!(DARK.bg_primary, LIGHT.bg_primary);
    }

    #[test]
    fn test_apply_theme_sets_mode() {
        let ctx = egui::Context::default();
        theme::apply_theme(&ctx, false);
        assert!(!ctx.style().visuals.dark_mode);
        theme::apply_theme(&ctx, true);
        assert!(ctx.style().visuals.dark_mode);
    }

    // ─── Panel Smoke Tests ───────────────────────────────────

    #[test]
    fn test_popup_panel_idle_frame() {
        let mut state = PopupUiState::new();
        state.follow_up_enabled = true;
        state.show_follow_up = true;
        state.result = ResultView::Markdown(md::render("**a**\n\nb"));
        assert_eq!(frame(|ui| popup_panel(ui, &mut state)), Some(PopupAction::None));
    }

    #[test]
    fn test_settings_panel_idle_frame() {
        let mut settings = Settings::default();
        let feedback = SaveFeedback::saved();
        assert_eq!(
            frame(|ui| settings_panel(ui, &mut settings, Some(&feedback))),
            Some(SettingsAction::None)
        );
    }

    #[test]
    fn test_history_panel_idle_frame() {
        let mut state = OptionsUiState::new();
        state.set_history(vec![conversation("a"), conversation("b")]);
        state.toggle_expanded("a");
        state.confirm_clear = true;
        assert_eq!(frame(|ui| history_panel(ui, &mut state)), Some(HistoryAction::None));
        assert!(state.confirm_clear);
    }
}
