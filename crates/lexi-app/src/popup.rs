//! Toolbar popup: egui front end over `PopupController`.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use egui::CentralPanel;
use wasm_bindgen_futures::spawn_local;

use lexi_core::event_bus::EventBus;
use lexi_core::popup::PopupController;
use lexi_core::settings::SettingsStore;
use lexi_platform::messaging::{ActiveTabMessenger, RuntimeMessenger};
use lexi_platform::storage::settings_storage;
use lexi_platform::timer::GlooTimer;
use lexi_platform::webext;
use lexi_types::config::Settings;
use lexi_ui::panels::popup::{popup_panel, PopupAction};
use lexi_ui::state::PopupUiState;
use lexi_ui::theme;

const HISTORY_PAGE: &str = "options.html#history";

pub struct PopupApp {
    ui_state: PopupUiState,
    event_bus: EventBus,
    controller: Rc<PopupController>,
    loaded_settings: Rc<RefCell<Option<Settings>>>,
    first_frame: bool,
}

impl PopupApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let event_bus = EventBus::new();
        let controller = Rc::new(PopupController::new(
            Rc::new(RuntimeMessenger),
            Rc::new(ActiveTabMessenger),
            Rc::new(GlooTimer),
            SettingsStore::new(settings_storage()),
            event_bus.clone(),
        ));
        Self {
            ui_state: PopupUiState::new(),
            event_bus,
            controller,
            loaded_settings: Rc::new(RefCell::new(None)),
            first_frame: true,
        }
    }

    /// Settings, the page selection and the liveness check, all in the background
    fn on_open(&self, ctx: &egui::Context) {
        let slot = self.loaded_settings.clone();
        self.run(ctx, |c| async move {
            let settings = c.load_settings().await;
            *slot.borrow_mut() = Some(settings);
        });
        self.run(ctx, |c| async move {
            c.prefill().await;
        });
        self.run(ctx, |c| async move {
            c.ping().await;
        });
    }

    /// Run a controller task and repaint when it settles
    fn run<F, Fut>(&self, ctx: &egui::Context, task: F)
    where
        F: FnOnce(Rc<PopupController>) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        let fut = task(self.controller.clone());
        let ctx = ctx.clone();
        spawn_local(async move {
            fut.await;
            ctx.request_repaint();
        });
    }

    fn dispatch(&mut self, action: PopupAction, ctx: &egui::Context) {
        match action {
            PopupAction::None => {}
            PopupAction::Lookup(text) => self.run(ctx, |c| async move { c.lookup(&text).await }),
            PopupAction::Explain(text) => self.run(ctx, |c| async move { c.explain(&text).await }),
            PopupAction::FollowUp(question) => {
                self.run(ctx, |c| async move { c.follow_up(&question).await })
            }
            PopupAction::SetDarkMode(enabled) => {
                theme::apply_theme(ctx, enabled);
                self.run(ctx, move |c| async move {
                    if let Err(e) = c.set_dark_mode(enabled).await {
                        log::error!("Failed to save dark mode: {}", e);
                    }
                });
            }
            PopupAction::SetAutoLookup(enabled) => {
                self.run(ctx, move |c| async move {
                    if let Err(e) = c.set_auto_lookup(enabled).await {
                        log::error!("Failed to save auto lookup: {}", e);
                    }
                });
            }
            PopupAction::OpenOptions => spawn_local(async {
                if let Err(e) = webext::open_options_page().await {
                    log::error!("Could not open options: {}", e);
                }
            }),
            PopupAction::OpenHistory => spawn_local(async {
                if let Err(e) = webext::open_extension_page(HISTORY_PAGE).await {
                    log::error!("Could not open history: {}", e);
                }
            }),
        }
    }
}

impl eframe::App for PopupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx, self.ui_state.dark_mode);
            self.on_open(ctx);
            self.first_frame = false;
        }

        if let Some(settings) = self.loaded_settings.borrow_mut().take() {
            self.ui_state.apply_settings(&settings);
            theme::apply_theme(ctx, settings.dark_mode);
        }

        let events = self.event_bus.drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }

        if self.ui_state.busy {
            ctx.request_repaint();
        }

        let action = CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| popup_panel(ui, &mut self.ui_state))
            .inner;
        self.dispatch(action, ctx);
    }
}
