//! Confirmation modal bound to the page template markup.
//!
//! # Design
//! - [`ConfirmModal`] owns the state; this controller only paints it and routes events.
//! - Listeners hold weak references, so the controller's owner decides its lifetime.
//! - The confirm callback runs after the modal is hidden and the state borrow released.

use crate::core::config::ModalIds;
use crate::core::error::DashboardError;
use crate::core::modal::{ConfirmCallback, ConfirmModal};
use gloo::console;
use gloo::events::EventListener;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent};

struct ModalElements {
    root: HtmlElement,
    title: Element,
    message: Element,
    confirm: HtmlElement,
    cancel: Element,
}

struct ModalInner {
    state: RefCell<ConfirmModal>,
    elements: ModalElements,
    listeners: RefCell<Vec<EventListener>>,
}

/// Handle to the page's single confirmation modal.
#[derive(Clone)]
pub struct ModalController {
    inner: Rc<ModalInner>,
}

impl ModalController {
    /// Resolve the modal markup and bind cancel, backdrop, confirm and Escape handling.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::MissingElement`] when any modal element is absent.
    pub fn bind(document: &Document, ids: &ModalIds) -> Result<Self, DashboardError> {
        let elements = ModalElements {
            root: html_element(document, &ids.root)?,
            title: element(document, &ids.title)?,
            message: element(document, &ids.message)?,
            confirm: html_element(document, &ids.confirm)?,
            cancel: element(document, &ids.cancel)?,
        };
        let inner = Rc::new(ModalInner {
            state: RefCell::new(ConfirmModal::default()),
            elements,
            listeners: RefCell::new(Vec::new()),
        });

        let weak = Rc::downgrade(&inner);
        let on_cancel = EventListener::new(&inner.elements.cancel, "click", {
            let weak = Weak::clone(&weak);
            move |_: &Event| with_controller(&weak, ModalController::dismiss)
        });
        let on_backdrop = EventListener::new(&inner.elements.root, "click", {
            let weak = Weak::clone(&weak);
            let root = JsValue::from(inner.elements.root.clone());
            move |event: &Event| {
                let on_root = event
                    .target()
                    .is_some_and(|target| JsValue::from(target) == root);
                if on_root {
                    with_controller(&weak, ModalController::dismiss);
                }
            }
        });
        let on_confirm = EventListener::new(&inner.elements.confirm, "click", {
            let weak = Weak::clone(&weak);
            move |_: &Event| with_controller(&weak, ModalController::confirm)
        });
        let on_keydown = EventListener::new(document, "keydown", move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                let key = event.key();
                with_controller(&weak, |modal| modal.handle_key(&key));
            }
        });
        inner
            .listeners
            .borrow_mut()
            .extend([on_cancel, on_backdrop, on_confirm, on_keydown]);

        let controller = Self { inner };
        controller.paint();
        Ok(controller)
    }

    /// Show the modal for a new request and focus the confirm button.
    pub fn show(&self, title: String, message: String, on_confirm: Option<ConfirmCallback>) {
        {
            let mut state = self.inner.state.borrow_mut();
            state.show(title, message, on_confirm);
            let elements = &self.inner.elements;
            elements.title.set_text_content(Some(state.title()));
            elements.message.set_text_content(Some(state.message()));
        }
        self.paint();
        if let Err(err) = self.inner.elements.confirm.focus() {
            console::warn!("confirm button focus failed", err);
        }
    }

    /// Hide the modal and run the pending callback, if any.
    pub fn confirm(&self) {
        let callback = self.inner.state.borrow_mut().confirm();
        self.paint();
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Hide the modal without running the pending callback.
    pub fn dismiss(&self) {
        self.inner.state.borrow_mut().dismiss();
        self.paint();
    }

    /// Route a key press; Escape dismisses while visible.
    pub fn handle_key(&self, key: &str) {
        let dismissed = self.inner.state.borrow_mut().handle_key(key);
        if dismissed {
            self.paint();
        }
    }

    /// Whether a confirmation is pending.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.inner.state.borrow().has_pending()
    }

    fn paint(&self) {
        let display = self.inner.state.borrow().visibility().display_value();
        let style = self.inner.elements.root.style();
        if let Err(err) = style.set_property("display", display) {
            console::error!("modal paint failed", err);
        }
    }
}

fn with_controller(weak: &Weak<ModalInner>, action: impl FnOnce(&ModalController)) {
    if let Some(inner) = weak.upgrade() {
        action(&ModalController { inner });
    }
}

fn element(document: &Document, id: &str) -> Result<Element, DashboardError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| DashboardError::MissingElement { id: id.to_string() })
}

fn html_element(document: &Document, id: &str) -> Result<HtmlElement, DashboardError> {
    element(document, id)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| DashboardError::Dom {
            operation: "dyn_into HtmlElement",
            detail: id.to_string(),
        })
}
