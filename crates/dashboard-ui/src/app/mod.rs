//! Page lifecycle: boot, page-ready wiring and the JS-facing globals.

mod globals;
pub(crate) mod preferences;

use crate::components::confirm_modal::ModalController;
use crate::components::theme_toggle::mount_theme_toggle;
use crate::core::config::DashboardConfig;
use crate::core::error::DashboardError;
use anyhow::Context;
use gloo::console;
use gloo::events::EventListener;
use gloo::utils::{document, window};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::Document;

/// Widgets bound at page-ready. The modal stays `None` when the template lacks it.
#[derive(Default)]
pub(crate) struct PageBindings {
    pub(crate) modal: Option<ModalController>,
}

/// Entrypoint invoked by Trunk for wasm32 builds.
pub fn run_app() {
    console_error_panic_hook::set_once();
    if let Err(err) = boot() {
        console::error!("dashboard boot failed", format!("{err:#}"));
    }
}

fn boot() -> anyhow::Result<()> {
    let window = window();
    let document = document();
    let config = Rc::new(preferences::load_config(&window));

    // Applied before anything renders so the first paint uses the stored mode.
    let theme = preferences::load_theme(&config);
    preferences::apply_theme(&config, theme).context("apply stored theme")?;

    let bindings = Rc::new(RefCell::new(PageBindings::default()));
    globals::install(&window, &config, &bindings).context("install page globals")?;

    let ready_document = document.clone();
    on_page_ready(&document, move || {
        page_ready(&ready_document, &config, &bindings);
    });
    Ok(())
}

fn on_page_ready(document: &Document, ready: impl FnOnce() + 'static) {
    if document.ready_state() == "loading" {
        EventListener::once(document, "DOMContentLoaded", move |_| ready()).forget();
    } else {
        ready();
    }
}

fn page_ready(
    document: &Document,
    config: &Rc<DashboardConfig>,
    bindings: &RefCell<PageBindings>,
) {
    match mount_theme_toggle(document, config) {
        Ok(Some(_)) => {}
        Ok(None) => console::debug!("navigation container missing; theme toggle skipped"),
        Err(err) => console::error!("theme toggle mount failed", err.to_string()),
    }

    match ModalController::bind(document, &config.modal) {
        Ok(controller) => bindings.borrow_mut().modal = Some(controller),
        Err(DashboardError::MissingElement { id }) => {
            console::debug!("confirm modal unavailable", id);
        }
        Err(err) => console::error!("confirm modal binding failed", err.to_string()),
    }
}
