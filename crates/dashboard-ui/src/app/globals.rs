//! Window globals called from the server-rendered templates.
//!
//! # Design
//! - Every global captures the shared config and page bindings; nothing is looked up
//!   through hidden statics.
//! - Modal globals are no-ops until page-ready has bound the modal.

use super::PageBindings;
use super::preferences;
use crate::core::config::DashboardConfig;
use crate::core::error::DashboardError;
use crate::core::modal::ConfirmCallback;
use crate::services::api::{ApiClient, ApiOutcome, RequestTarget};
use crate::services::log_stream::stream_log;
use gloo::console;
use js_sys::{Function, Object, Promise, Reflect};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::future_to_promise;
use web_sys::{HtmlElement, Request, Window};

pub(super) fn install(
    window: &Window,
    config: &Rc<DashboardConfig>,
    bindings: &Rc<RefCell<PageBindings>>,
) -> Result<(), DashboardError> {
    let toggle = {
        let config = Rc::clone(config);
        Closure::<dyn Fn()>::new(move || preferences::toggle_theme(&config))
    };
    set_global(window, "toggleTheme", toggle.into_js_value())?;

    let api_call = {
        let client = ApiClient::new(Rc::clone(config));
        Closure::<dyn Fn(JsValue, JsValue) -> Promise>::new(move |url: JsValue, options: JsValue| {
            api_call(client.clone(), url, options)
        })
    };
    set_global(window, "apiCall", api_call.into_js_value())?;

    let stream = {
        let config = Rc::clone(config);
        Closure::<dyn Fn(JsValue, JsValue) -> Result<JsValue, JsValue>>::new(
            move |exec_id: JsValue, target: JsValue| {
                let target = target.dyn_into::<HtmlElement>().ok();
                stream_log(&config, &js_string(&exec_id), target)
                    .map(|handle| JsValue::from(handle.source().clone()))
                    .map_err(|err| js_error(&err))
            },
        )
    };
    set_global(window, "streamLog", stream.into_js_value())?;

    let show = {
        let bindings = Rc::clone(bindings);
        Closure::<dyn Fn(JsValue, JsValue, JsValue)>::new(
            move |title: JsValue, message: JsValue, on_confirm: JsValue| {
                let Some(modal) = bindings.borrow().modal.clone() else {
                    return;
                };
                let callback = on_confirm.dyn_into::<Function>().ok().map(js_callback);
                modal.show(js_string(&title), js_string(&message), callback);
            },
        )
    };
    set_global(window, "showConfirmModal", show.into_js_value())?;

    let hide = {
        let bindings = Rc::clone(bindings);
        Closure::<dyn Fn()>::new(move || {
            let modal = bindings.borrow().modal.clone();
            if let Some(modal) = modal {
                modal.dismiss();
            }
        })
    };
    set_global(window, "hideConfirmModal", hide.into_js_value())
}

fn api_call(client: ApiClient, url: JsValue, options: JsValue) -> Promise {
    future_to_promise(async move {
        let target = url.dyn_into::<Request>().map_or_else(
            |url| RequestTarget::Url(js_string(&url)),
            RequestTarget::Request,
        );
        let options = request_options(options).map_err(|err| js_error(&err))?;
        match client.call(&target, &options).await {
            Ok(ApiOutcome::Response(response)) => Ok(response.into()),
            Ok(ApiOutcome::Redirected) => Ok(JsValue::NULL),
            Err(err) => Err(js_error(&err)),
        }
    })
}

/// The caller's options object itself; a fresh one when omitted.
fn request_options(raw: JsValue) -> Result<Object, DashboardError> {
    if raw.is_undefined() || raw.is_null() {
        return Ok(Object::new());
    }
    raw.dyn_into::<Object>()
        .map_err(|raw| DashboardError::InvalidRequestOptions {
            detail: format!("expected an object, got {}", js_string(&raw)),
        })
}

/// `String(value)`, so numbers, URLs and other objects keep their text form.
fn js_string(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            Reflect::get(&js_sys::global(), &JsValue::from_str("String"))
                .ok()?
                .dyn_into::<Function>()
                .ok()?
                .call1(&JsValue::UNDEFINED, value)
                .ok()?
                .as_string()
        })
        .unwrap_or_default()
}

fn js_callback(function: Function) -> ConfirmCallback {
    Box::new(move || {
        if let Err(err) = function.call0(&JsValue::NULL) {
            console::error!("confirm callback threw", err);
        }
    })
}

fn js_error(err: &DashboardError) -> JsValue {
    let message = match err {
        DashboardError::Fetch { detail }
        | DashboardError::InvalidRequestOptions { detail }
        | DashboardError::Dom { detail, .. } => format!("{err}: {detail}"),
        other => other.to_string(),
    };
    js_sys::Error::new(&message).into()
}

fn set_global(window: &Window, name: &'static str, value: JsValue) -> Result<(), DashboardError> {
    Reflect::set(window, &JsValue::from_str(name), &value)
        .map(|_| ())
        .map_err(|err| DashboardError::Dom {
            operation: "window global",
            detail: format!("{name}: {err:?}"),
        })
}
