//! The on-page tooltip, built lazily inside an open shadow root so page
//! CSS does not leak in.
//!
//! Markdown spans are appended as text nodes inside `strong`/`em`/`code`
//! elements; nothing is ever assigned as HTML.

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, ShadowRootInit, ShadowRootMode};

use lexi_core::markdown::{Block, Span};
use lexi_core::page::{Anchor, OverlayContent, OverlayState};
use lexi_core::ports::PageView;
use lexi_types::{LexiError, Result};
use crate::webext::describe;

const HOST_ID: &str = "lexi-tooltip-host";
const TITLE: &str = "Quick Definition";
const EXPLAIN_LABEL: &str = "Explain with AI";
const EXPLAIN_BUSY_LABEL: &str = "Explaining...";
const LOADING: &str = "Loading...";

const HOST_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("z-index", "2147483647"),
    ("top", "0"),
    ("left", "0"),
    ("pointer-events", "none"),
];

const WRAP_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("pointer-events", "auto"),
    ("max-width", "360px"),
    ("background", "rgba(17,24,39,0.98)"),
    ("color", "white"),
    ("padding", "10px 12px"),
    ("border-radius", "12px"),
    ("box-shadow", "0 8px 20px rgba(0,0,0,0.35)"),
    ("font-family", "system-ui, -apple-system, Segoe UI, Roboto, Arial"),
    ("font-size", "14px"),
    ("white-space", "pre-wrap"),
    ("display", "none"),
];

const CLOSE_STYLE: &[(&str, &str)] = &[
    ("border", "0"),
    ("background", "transparent"),
    ("color", "white"),
    ("cursor", "pointer"),
    ("float", "right"),
    ("margin-left", "8px"),
];

const EXPLAIN_STYLE: &[(&str, &str)] = &[
    ("border", "0"),
    ("border-radius", "8px"),
    ("padding", "6px 10px"),
    ("cursor", "pointer"),
    ("background-color", "white"),
    ("color", "black"),
];

const CODE_STYLE: &[(&str, &str)] = &[
    ("background-color", "rgba(255,255,255,0.15)"),
    ("padding", "2px 4px"),
    ("border-radius", "3px"),
];

/// Callbacks wired to the tooltip's buttons
#[derive(Clone)]
pub struct OverlayActions {
    pub on_close: Rc<dyn Fn()>,
    pub on_explain: Rc<dyn Fn()>,
}

struct Parts {
    wrap: HtmlElement,
    content: HtmlElement,
    explain: HtmlButtonElement,
}

pub struct DomOverlay {
    document: Document,
    actions: RefCell<Option<OverlayActions>>,
    parts: RefCell<Option<Parts>>,
}

impl DomOverlay {
    pub fn new() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| LexiError::JsInterop("No document".to_string()))?;
        Ok(Self {
            document,
            actions: RefCell::new(None),
            parts: RefCell::new(None),
        })
    }

    /// Set the button callbacks. Must be called before the first render
    /// for the buttons to do anything.
    pub fn set_actions(&self, actions: OverlayActions) {
        *self.actions.borrow_mut() = Some(actions);
    }

    fn ensure(&self) -> Result<()> {
        if self.parts.borrow().is_some() {
            return Ok(());
        }
        let parts = self.build().map_err(|e| LexiError::JsInterop(describe(&e)))?;
        *self.parts.borrow_mut() = Some(parts);
        Ok(())
    }

    fn build(&self) -> std::result::Result<Parts, JsValue> {
        let host = self.html("div")?;
        host.set_id(HOST_ID);
        style(&host, HOST_STYLE)?;
        self.document
            .document_element()
            .ok_or_else(|| JsValue::from_str("No document element"))?
            .append_child(&host)?;
        let shadow = host.attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))?;

        let wrap = self.html("div")?;
        style(&wrap, WRAP_STYLE)?;

        let close: HtmlButtonElement = self.html("button")?.dyn_into()?;
        close.set_text_content(Some("✕"));
        style(&close, CLOSE_STYLE)?;

        let title = self.html("div")?;
        title.set_text_content(Some(TITLE));
        style(&title, &[("font-weight", "600"), ("margin-bottom", "6px")])?;

        let content = self.html("div")?;
        content.set_text_content(Some("..."));

        let actions = self.html("div")?;
        style(&actions, &[("margin-top", "8px"), ("display", "flex"), ("gap", "8px")])?;

        let explain: HtmlButtonElement = self.html("button")?.dyn_into()?;
        explain.set_text_content(Some(EXPLAIN_LABEL));
        style(&explain, EXPLAIN_STYLE)?;

        actions.append_child(&explain)?;
        wrap.append_child(&close)?;
        wrap.append_child(&title)?;
        wrap.append_child(&content)?;
        wrap.append_child(&actions)?;
        shadow.append_child(&wrap)?;

        if let Some(actions) = self.actions.borrow().clone() {
            let on_close = actions.on_close;
            on_click(&close, move |event| {
                event.stop_propagation();
                on_close();
            })?;
            let on_explain = actions.on_explain;
            on_click(&explain, move |_| on_explain())?;
        }

        Ok(Parts { wrap, content, explain })
    }

    fn html(&self, tag: &str) -> std::result::Result<HtmlElement, JsValue> {
        self.document.create_element(tag)?.dyn_into::<HtmlElement>().map_err(JsValue::from)
    }

    fn fill(&self, content: &HtmlElement, overlay: &OverlayContent) -> std::result::Result<(), JsValue> {
        match overlay {
            OverlayContent::Plain(text) => content.set_text_content(Some(text.as_str())),
            OverlayContent::Markdown(blocks) => {
                content.set_text_content(None);
                for block in blocks {
                    let node: Element = match block {
                        Block::Break => self.document.create_element("br")?,
                        Block::Paragraph(spans) => self.paragraph(spans)?.into(),
                    };
                    content.append_child(&node)?;
                }
            }
        }
        Ok(())
    }

    fn paragraph(&self, spans: &[Span]) -> std::result::Result<HtmlElement, JsValue> {
        let p = self.html("p")?;
        style(&p, &[("margin", "0"), ("padding", "0")])?;
        for span in spans {
            let tag = match span {
                Span::Text(text) => {
                    p.append_child(&self.document.create_text_node(text))?;
                    continue;
                }
                Span::Bold(_) => "strong",
                Span::Italic(_) => "em",
                Span::Code(_) => "code",
            };
            let el = self.html(tag)?;
            if matches!(span, Span::Code(_)) {
                style(&el, CODE_STYLE)?;
            }
            el.append_child(&self.document.create_text_node(span.text()))?;
            p.append_child(&el)?;
        }
        Ok(p)
    }

    fn show(&self, state: &OverlayState, anchor: Anchor) -> std::result::Result<(), JsValue> {
        let parts = self.parts.borrow();
        let Some(parts) = parts.as_ref() else {
            return Ok(());
        };
        match state {
            OverlayState::Hidden => return parts.wrap.style().set_property("display", "none"),
            OverlayState::Loading => parts.content.set_text_content(Some(LOADING)),
            OverlayState::Populated(content) => self.fill(&parts.content, content)?,
        }
        let css = parts.wrap.style();
        css.set_property("left", &format!("{}px", anchor.x))?;
        css.set_property("top", &format!("{}px", anchor.y))?;
        css.set_property("display", "block")
    }
}

impl PageView for DomOverlay {
    fn render(&self, state: &OverlayState, anchor: Anchor) {
        if state.is_visible() {
            if let Err(e) = self.ensure() {
                log::warn!("Tooltip unavailable: {}", e);
                return;
            }
        }
        if let Err(e) = self.show(state, anchor) {
            log::warn!("Tooltip render failed: {}", describe(&e));
        }
    }

    fn set_explain_busy(&self, busy: bool) {
        if let Some(parts) = self.parts.borrow().as_ref() {
            parts.explain.set_disabled(busy);
            parts
                .explain
                .set_text_content(Some(if busy { EXPLAIN_BUSY_LABEL } else { EXPLAIN_LABEL }));
        }
    }

    fn clear_page_selection(&self) {
        let selection = web_sys::window().and_then(|w| w.get_selection().ok().flatten());
        if let Some(selection) = selection {
            if let Err(e) = selection.remove_all_ranges() {
                log::debug!("Could not clear selection: {}", describe(&e));
            }
        }
    }

    fn current_selection(&self) -> String {
        current_selection()
    }
}

/// Whether a document-level event came from inside the tooltip.
/// Shadow DOM retargets such events to the host element.
pub fn is_overlay_event(event: &web_sys::Event) -> bool {
    event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .map(|el| el.id() == HOST_ID)
        .unwrap_or(false)
}

/// The window's selection as text, untrimmed
pub fn current_selection() -> String {
    web_sys::window()
        .and_then(|w| w.get_selection().ok().flatten())
        .map(|s| String::from(s.to_string()))
        .unwrap_or_default()
}

fn style(el: &HtmlElement, rules: &[(&str, &str)]) -> std::result::Result<(), JsValue> {
    let css = el.style();
    for (name, value) in rules {
        css.set_property(name, value)?;
    }
    Ok(())
}

fn on_click(
    el: &HtmlElement,
    handler: impl Fn(web_sys::Event) + 'static,
) -> std::result::Result<(), JsValue> {
    let closure = Closure::<dyn Fn(web_sys::Event)>::new(handler);
    el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
