//! Theme toggle button injected into the navigation bar.

use crate::app::preferences;
use crate::core::config::DashboardConfig;
use crate::core::error::DashboardError;
use gloo::events::EventListener;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

/// Append the toggle as the last child of the navigation container.
///
/// The click listener lives as long as the page. Returns `Ok(None)` when the page has
/// no navigation container.
///
/// # Errors
///
/// Returns [`DashboardError::Dom`] when the button cannot be created or attached.
pub fn mount_theme_toggle(
    document: &Document,
    config: &Rc<DashboardConfig>,
) -> Result<Option<Element>, DashboardError> {
    let Some(nav) = document
        .query_selector(&config.nav_selector)
        .map_err(|err| dom_error("querySelector", &err))?
    else {
        return Ok(None);
    };

    let button = document
        .create_element("button")
        .map_err(|err| dom_error("createElement", &err))?;
    button
        .set_attribute("type", "button")
        .map_err(|err| dom_error("setAttribute", &err))?;
    button
        .set_attribute("aria-label", "Toggle theme")
        .map_err(|err| dom_error("setAttribute", &err))?;
    button.set_class_name(&config.toggle_class);
    button.set_text_content(Some(&config.toggle_label));

    let on_click = {
        let config = Rc::clone(config);
        EventListener::new(&button, "click", move |_| preferences::toggle_theme(&config))
    };
    nav.append_child(&button)
        .map_err(|err| dom_error("appendChild", &err))?;
    on_click.forget();
    Ok(Some(button))
}

fn dom_error(operation: &'static str, err: &JsValue) -> DashboardError {
    DashboardError::Dom {
        operation,
        detail: format!("{err:?}"),
    }
}
