//! Options page: settings form and chat history browser.

use std::future::Future;

use egui::{CentralPanel, ScrollArea};
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use wasm_bindgen_futures::spawn_local;

use lexi_core::history::ChatHistoryStore;
use lexi_core::ports::TimerPort;
use lexi_core::settings::SettingsStore;
use lexi_platform::storage::{history_storage, settings_storage};
use lexi_platform::timer::GlooTimer;
use lexi_types::config::Settings;
use lexi_types::conversation::Conversation;
use lexi_ui::panels::history::{history_panel, HistoryAction};
use lexi_ui::panels::options::{normalize, settings_panel, SettingsAction};
use lexi_ui::state::{OptionsUiState, SaveFeedback};
use lexi_ui::theme;

const FEEDBACK_MS: u64 = 2_000;

/// Results of background work, applied on the next frame
enum Update {
    Settings(Settings),
    History(Vec<Conversation>),
    Feedback(Option<SaveFeedback>),
}

pub struct OptionsApp {
    ui_state: OptionsUiState,
    settings: SettingsStore,
    history: ChatHistoryStore,
    tx: UnboundedSender<Update>,
    rx: UnboundedReceiver<Update>,
    /// Opened as `options.html#history`
    history_first: bool,
    first_frame: bool,
}

impl OptionsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let (tx, rx) = unbounded();
        let history_first = web_sys::window()
            .and_then(|w| w.location().hash().ok())
            .map(|hash| hash == "#history")
            .unwrap_or(false);
        Self {
            ui_state: OptionsUiState::new(),
            settings: SettingsStore::new(settings_storage()),
            history: ChatHistoryStore::new(history_storage()),
            tx,
            rx,
            history_first,
            first_frame: true,
        }
    }

    fn spawn<Fut>(&self, ctx: &egui::Context, task: Fut)
    where
        Fut: Future<Output = Option<Update>> + 'static,
    {
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        spawn_local(async move {
            if let Some(update) = task.await {
                let _ = tx.unbounded_send(update);
            }
            ctx.request_repaint();
        });
    }

    fn load_settings(&self, ctx: &egui::Context) {
        let store = self.settings.clone();
        self.spawn(ctx, async move {
            match store.load().await {
                Ok(settings) => Some(Update::Settings(settings)),
                Err(e) => {
                    log::error!("Failed to load settings: {}", e);
                    None
                }
            }
        });
    }

    fn load_history(&self, ctx: &egui::Context) {
        let store = self.history.clone();
        self.spawn(ctx, async move {
            match store.list().await {
                Ok(history) => Some(Update::History(history)),
                Err(e) => {
                    log::error!("Failed to load chat history: {}", e);
                    Some(Update::History(Vec::new()))
                }
            }
        });
    }

    fn save_settings(&mut self, ctx: &egui::Context) {
        let settings = normalize(&self.ui_state.settings);
        self.ui_state.settings = settings.clone();
        theme::apply_theme(ctx, settings.dark_mode);

        let store = self.settings.clone();
        let tx = self.tx.clone();
        self.spawn(ctx, async move {
            let feedback = match store.save(&settings).await {
                Ok(()) => {
                    log::info!("Settings saved");
                    SaveFeedback::saved()
                }
                Err(e) => {
                    log::error!("Failed to save settings: {}", e);
                    SaveFeedback::failed(e)
                }
            };
            let _ = tx.unbounded_send(Update::Feedback(Some(feedback)));
            GlooTimer.sleep(FEEDBACK_MS).await;
            Some(Update::Feedback(None))
        });
    }

    fn clear_history(&self, ctx: &egui::Context) {
        let store = self.history.clone();
        self.spawn(ctx, async move {
            if let Err(e) = store.clear().await {
                log::error!("Failed to clear chat history: {}", e);
            }
            match store.list().await {
                Ok(history) => Some(Update::History(history)),
                Err(_) => Some(Update::History(Vec::new())),
            }
        });
    }

    fn apply_updates(&mut self, ctx: &egui::Context) {
        while let Ok(Some(update)) = self.rx.try_next() {
            match update {
                Update::Settings(settings) => {
                    theme::apply_theme(ctx, settings.dark_mode);
                    self.ui_state.settings = settings;
                }
                Update::History(history) => self.ui_state.set_history(history),
                Update::Feedback(feedback) => self.ui_state.save_feedback = feedback,
            }
        }
    }

    fn settings_section(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let action = settings_panel(
            ui,
            &mut self.ui_state.settings,
            self.ui_state.save_feedback.as_ref(),
        );
        if action == SettingsAction::SaveClicked {
            self.save_settings(ctx);
        }
    }

    fn history_section(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        match history_panel(ui, &mut self.ui_state) {
            HistoryAction::None => {}
            HistoryAction::Clear => self.clear_history(ctx),
            HistoryAction::Refresh => self.load_history(ctx),
        }
    }
}

impl eframe::App for OptionsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx, self.ui_state.settings.dark_mode);
            self.load_settings(ctx);
            self.load_history(ctx);
            self.first_frame = false;
        }

        self.apply_updates(ctx);

        CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.set_max_width(720.0);
                if self.history_first {
                    self.history_section(ui, ctx);
                    ui.add_space(12.0);
                    self.settings_section(ui, ctx);
                } else {
                    self.settings_section(ui, ctx);
                    ui.add_space(12.0);
                    self.history_section(ui, ctx);
                }
            });
        });
    }
}
