//! Browser-level checks for the page widgets, fetch helper, log stream and globals.
#![cfg(target_arch = "wasm32")]

use dashboard_ui::components::confirm_modal::ModalController;
use dashboard_ui::components::theme_toggle::mount_theme_toggle;
use dashboard_ui::core::config::{DashboardConfig, ModalIds};
use dashboard_ui::services::api::{ApiClient, ApiOutcome, RequestTarget};
use dashboard_ui::services::log_stream::stream_log;
use gloo::storage::{LocalStorage, Storage as _};
use gloo::utils::{document, window};
use js_sys::{Array, Function, JSON, Object, Promise, Reflect};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Event, EventSource, Headers, HtmlElement, KeyboardEvent, KeyboardEventInit};

wasm_bindgen_test_configure!(run_in_browser);

const FETCH_RECORD: &str = "__dashboardLastFetch";

fn fixture(markup: &str) -> HtmlElement {
    let host = document()
        .create_element("div")
        .expect("host")
        .dyn_into::<HtmlElement>()
        .expect("html host");
    host.set_inner_html(markup);
    document()
        .body()
        .expect("body")
        .append_child(&host)
        .expect("attach");
    host
}

fn modal_host(ids: &ModalIds) -> HtmlElement {
    fixture(&format!(
        r#"<div id="{root}" style="display:none"><div class="modal-content">
             <h3 id="{title}"></h3><p id="{message}"></p>
             <button id="{cancel}">Cancel</button><button id="{confirm}">Confirm</button>
           </div></div>"#,
        root = ids.root,
        title = ids.title,
        message = ids.message,
        cancel = ids.cancel,
        confirm = ids.confirm,
    ))
}

fn modal_fixture(prefix: &str) -> (HtmlElement, ModalIds) {
    let ids = ModalIds {
        root: format!("{prefix}-root"),
        title: format!("{prefix}-title"),
        message: format!("{prefix}-message"),
        cancel: format!("{prefix}-cancel"),
        confirm: format!("{prefix}-confirm"),
    };
    (modal_host(&ids), ids)
}

fn by_id(id: &str) -> HtmlElement {
    document()
        .get_element_by_id(id)
        .expect("element")
        .dyn_into::<HtmlElement>()
        .expect("html element")
}

fn display(id: &str) -> String {
    by_id(id)
        .style()
        .get_property_value("display")
        .expect("display")
}

fn counting_callback() -> (Rc<Cell<u32>>, Box<dyn FnOnce()>) {
    let hits = Rc::new(Cell::new(0));
    let inner = Rc::clone(&hits);
    (hits, Box::new(move || inner.set(inner.get() + 1)))
}

fn prop(target: &JsValue, name: &str) -> JsValue {
    Reflect::get(target, &JsValue::from_str(name)).expect("property")
}

fn global_fn(name: &str) -> Function {
    prop(&window(), name).dyn_into::<Function>().expect("global function")
}

fn message_event(data: &str) -> Event {
    Function::new_with_args("data", "return new MessageEvent('message', { data: data });")
        .call1(&JsValue::NULL, &JsValue::from_str(data))
        .expect("message event")
        .unchecked_into::<Event>()
}

async fn next_tick() {
    JsFuture::from(Promise::resolve(&JsValue::NULL))
        .await
        .expect("tick");
}

/// Replaces `window.fetch` with a stub answering `status`; restored on drop.
struct FetchStub {
    original: JsValue,
}

impl FetchStub {
    fn install(status: u16) -> Self {
        let original = prop(&window(), "fetch");
        let body = format!(
            "const response = new Response(null, {{ status: {status} }});
             globalThis.{FETCH_RECORD} = {{ input: input, init: init, response: response }};
             return Promise.resolve(response);"
        );
        let stub = Function::new_with_args("input, init", &body);
        Reflect::set(&window(), &JsValue::from_str("fetch"), &stub).expect("install stub");
        Self { original }
    }

    fn last(&self, field: &str) -> JsValue {
        prop(&prop(&js_sys::global(), FETCH_RECORD), field)
    }
}

impl Drop for FetchStub {
    fn drop(&mut self) {
        let _ = Reflect::set(&window(), &JsValue::from_str("fetch"), &self.original);
    }
}

fn token_config(token_key: &str, token: Option<&str>) -> Rc<DashboardConfig> {
    let storage = LocalStorage::raw();
    match token {
        Some(token) => storage.set_item(token_key, token).expect("store token"),
        None => storage.remove_item(token_key).expect("clear token"),
    }
    Rc::new(DashboardConfig {
        token_key: token_key.to_string(),
        login_path: "#login-required".to_string(),
        ..DashboardConfig::default()
    })
}

#[wasm_bindgen_test]
fn confirm_button_runs_callback_once_and_hides() {
    let (host, ids) = modal_fixture("confirm-once");
    let modal = ModalController::bind(&document(), &ids).expect("bind");
    let (hits, callback) = counting_callback();

    modal.show("Delete".to_string(), "Really?".to_string(), Some(callback));
    assert_eq!(display(&ids.root), "flex");
    assert_eq!(by_id(&ids.title).text_content().as_deref(), Some("Delete"));
    assert_eq!(by_id(&ids.message).text_content().as_deref(), Some("Really?"));

    by_id(&ids.confirm).click();
    assert_eq!(hits.get(), 1);
    assert_eq!(display(&ids.root), "none");
    assert!(!modal.has_pending());

    by_id(&ids.confirm).click();
    assert_eq!(hits.get(), 1);
    host.remove();
}

#[wasm_bindgen_test]
fn cancel_backdrop_and_escape_skip_callback() {
    let (host, ids) = modal_fixture("dismiss");
    let modal = ModalController::bind(&document(), &ids).expect("bind");

    let (cancel_hits, callback) = counting_callback();
    modal.show("T".to_string(), "M".to_string(), Some(callback));
    by_id(&ids.cancel).click();
    assert_eq!(display(&ids.root), "none");

    let (backdrop_hits, callback) = counting_callback();
    modal.show("T".to_string(), "M".to_string(), Some(callback));
    by_id(&ids.title).click();
    assert_eq!(display(&ids.root), "flex");
    by_id(&ids.root).click();
    assert_eq!(display(&ids.root), "none");

    let (escape_hits, callback) = counting_callback();
    modal.show("T".to_string(), "M".to_string(), Some(callback));
    let init = KeyboardEventInit::new();
    init.set_key("Escape");
    let escape =
        KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).expect("event");
    document().dispatch_event(&escape).expect("dispatch");
    assert_eq!(display(&ids.root), "none");

    assert_eq!(cancel_hits.get(), 0);
    assert_eq!(backdrop_hits.get(), 0);
    assert_eq!(escape_hits.get(), 0);
    assert!(!modal.has_pending());
    host.remove();
}

#[wasm_bindgen_test]
fn programmatic_hide_drops_pending_callback() {
    let (host, ids) = modal_fixture("hide");
    let modal = ModalController::bind(&document(), &ids).expect("bind");
    let (hits, callback) = counting_callback();
    modal.show("T".to_string(), "M".to_string(), Some(callback));
    modal.dismiss();
    by_id(&ids.confirm).click();
    assert_eq!(hits.get(), 0);
    host.remove();
}

#[wasm_bindgen_test]
fn missing_modal_markup_is_reported() {
    let ids = ModalIds {
        root: "absent-modal".to_string(),
        ..ModalIds::default()
    };
    assert!(ModalController::bind(&document(), &ids).is_err());
}

#[wasm_bindgen_test]
fn theme_toggle_is_appended_and_flips_mode() {
    let host = fixture(r#"<nav class="toggle-test"><div class="container"><a>Home</a></div></nav>"#);
    let config = Rc::new(DashboardConfig {
        nav_selector: ".toggle-test .container".to_string(),
        ..DashboardConfig::default()
    });
    let root = document().document_element().expect("root");
    root.set_attribute("data-theme", "light").expect("attr");

    let button = mount_theme_toggle(&document(), &config)
        .expect("mount")
        .expect("nav present");
    let container = document()
        .query_selector(".toggle-test .container")
        .expect("query")
        .expect("container");
    assert!(container.last_element_child().is_some_and(|last| last == button));
    assert_eq!(button.class_name(), "theme-toggle");

    let button = button.dyn_into::<HtmlElement>().expect("html button");
    button.click();
    assert_eq!(root.get_attribute("data-theme").as_deref(), Some("dark"));
    let stored = LocalStorage::raw().get_item("theme").expect("read theme");
    assert_eq!(stored.as_deref(), Some("dark"));

    button.click();
    assert_eq!(root.get_attribute("data-theme").as_deref(), Some("light"));
    host.remove();
}

#[wasm_bindgen_test]
fn theme_toggle_skips_pages_without_nav() {
    let config = Rc::new(DashboardConfig {
        nav_selector: ".no-such-nav .container".to_string(),
        ..DashboardConfig::default()
    });
    assert!(mount_theme_toggle(&document(), &config).expect("mount").is_none());
}

#[wasm_bindgen_test]
async fn bearer_is_added_and_caller_options_reach_fetch_untouched() {
    let config = token_config("api-bearer-token", Some("abc"));
    let stub = FetchStub::install(200);
    let options = JSON::parse(
        r#"{"credentials":"include","mode":"cors","headers":{"authorization":"Basic old","X-Page":2}}"#,
    )
    .expect("options")
    .unchecked_into::<Object>();

    let outcome = ApiClient::new(config)
        .call(&RequestTarget::Url("/api/items".to_string()), &options)
        .await
        .expect("call");
    let ApiOutcome::Response(response) = outcome else {
        panic!("expected the response to pass through");
    };

    assert!(Object::is(&response, &stub.last("response")));
    assert!(Object::is(&options, &stub.last("init")));
    assert_eq!(stub.last("input").as_string().as_deref(), Some("/api/items"));
    assert_eq!(prop(&options, "credentials").as_string().as_deref(), Some("include"));
    assert_eq!(prop(&options, "mode").as_string().as_deref(), Some("cors"));

    let headers = prop(&options, "headers");
    assert_eq!(
        prop(&headers, "Authorization").as_string().as_deref(),
        Some("Bearer abc")
    );
    assert!(prop(&headers, "authorization").is_undefined());
    assert_eq!(prop(&headers, "X-Page").as_f64(), Some(2.0));
    LocalStorage::delete("api-bearer-token");
}

#[wasm_bindgen_test]
async fn anonymous_call_leaves_headers_unset() {
    let config = token_config("api-anonymous-token", None);
    let stub = FetchStub::install(204);
    let options = Object::new();

    let outcome = ApiClient::new(config)
        .call(&RequestTarget::Url("/api/items".to_string()), &options)
        .await
        .expect("call");

    assert!(matches!(outcome, ApiOutcome::Response(ref response) if response.status() == 204));
    assert!(prop(&options, "headers").is_undefined());
    assert!(Object::is(&options, &stub.last("init")));
}

#[wasm_bindgen_test]
async fn bearer_lands_in_headers_instances_and_pair_lists() {
    let config = token_config("api-shapes-token", Some("abc"));
    let _stub = FetchStub::install(200);
    let client = ApiClient::new(config);
    let target = RequestTarget::Url("/api/items".to_string());

    let headers = Headers::new().expect("headers");
    headers.set("authorization", "Basic old").expect("set");
    headers.set("Accept", "application/json").expect("set");
    let options = Object::new();
    Reflect::set(&options, &JsValue::from_str("headers"), &headers).expect("headers");
    client.call(&target, &options).await.expect("call");
    assert_eq!(
        headers.get("Authorization").expect("get").as_deref(),
        Some("Bearer abc")
    );
    assert_eq!(
        headers.get("Accept").expect("get").as_deref(),
        Some("application/json")
    );

    let pairs = JSON::parse(r#"[["Authorization","Basic old"],["Accept","text/plain"]]"#)
        .expect("pairs")
        .unchecked_into::<Array>();
    let options = Object::new();
    Reflect::set(&options, &JsValue::from_str("headers"), &pairs).expect("headers");
    client.call(&target, &options).await.expect("call");
    assert_eq!(pairs.length(), 2);
    let last = pairs.get(1).unchecked_into::<Array>();
    assert_eq!(last.get(0).as_string().as_deref(), Some("Authorization"));
    assert_eq!(last.get(1).as_string().as_deref(), Some("Bearer abc"));
    LocalStorage::delete("api-shapes-token");
}

#[wasm_bindgen_test]
async fn unauthorized_response_redirects_to_login() {
    let config = token_config("api-unauthorized-token", None);
    let _stub = FetchStub::install(401);

    let outcome = ApiClient::new(config)
        .call(&RequestTarget::Url("/api/items".to_string()), &Object::new())
        .await
        .expect("call");

    assert!(matches!(outcome, ApiOutcome::Redirected));
    let location = window().location();
    assert_eq!(location.hash().expect("hash"), "#login-required");
    location.set_hash("").expect("reset hash");
}

#[wasm_bindgen_test]
async fn stream_appends_in_order_and_closes_on_first_error() {
    let host = fixture(r#"<pre id="stream-target">$ run
</pre>"#);
    let target = by_id("stream-target");
    let handle = stream_log(&DashboardConfig::default(), "7", Some(target.clone())).expect("stream");
    let source = handle.source().clone();
    assert!(source.url().ends_with("/api/executions/7/log/stream"));

    for chunk in ["a\n", "b\n"] {
        source.dispatch_event(&message_event(chunk)).expect("dispatch");
    }
    assert_eq!(target.text_content().as_deref(), Some("$ run\na\nb\n"));

    source
        .dispatch_event(&Event::new("error").expect("error event"))
        .expect("dispatch");
    assert_eq!(source.ready_state(), EventSource::CLOSED);
    source.dispatch_event(&message_event("late\n")).expect("dispatch");

    next_tick().await;
    source.dispatch_event(&message_event("later\n")).expect("dispatch");
    assert_eq!(target.text_content().as_deref(), Some("$ run\na\nb\n"));
    handle.close();
    host.remove();
}

#[wasm_bindgen_test]
fn closed_stream_stops_appending() {
    let host = fixture(r#"<pre id="closed-stream-target"></pre>"#);
    let target = by_id("closed-stream-target");
    let handle = stream_log(&DashboardConfig::default(), "8", Some(target.clone())).expect("stream");
    let source = handle.source().clone();

    source.dispatch_event(&message_event("a\n")).expect("dispatch");
    handle.close();
    handle.close();
    source.dispatch_event(&message_event("b\n")).expect("dispatch");

    assert_eq!(source.ready_state(), EventSource::CLOSED);
    assert_eq!(target.text_content().as_deref(), Some("a\n"));
    host.remove();
}

#[wasm_bindgen_test]
fn modal_globals_are_no_ops_without_markup() {
    dashboard_ui::run_app();
    let hits = Function::new_no_args(
        "globalThis.__dashboardConfirmHits = (globalThis.__dashboardConfirmHits || 0) + 1;",
    );

    global_fn("showConfirmModal")
        .call3(
            &JsValue::NULL,
            &JsValue::from_str("T"),
            &JsValue::from_str("M"),
            &hits,
        )
        .expect("show is a no-op");
    global_fn("hideConfirmModal")
        .call0(&JsValue::NULL)
        .expect("hide is a no-op");

    assert!(prop(&js_sys::global(), "__dashboardConfirmHits").is_undefined());
    assert!(document().get_element_by_id("confirm-modal").is_none());
}

#[wasm_bindgen_test]
fn globals_coerce_non_string_arguments() {
    let host = modal_host(&ModalIds::default());
    dashboard_ui::run_app();

    global_fn("showConfirmModal")
        .call3(
            &JsValue::NULL,
            &JsValue::from_f64(5.0),
            &JsValue::from_str("M"),
            &JsValue::UNDEFINED,
        )
        .expect("show");
    assert_eq!(by_id("modal-title").text_content().as_deref(), Some("5"));
    assert_eq!(display("confirm-modal"), "flex");
    global_fn("hideConfirmModal")
        .call0(&JsValue::NULL)
        .expect("hide");
    assert_eq!(display("confirm-modal"), "none");

    let source = global_fn("streamLog")
        .call2(&JsValue::NULL, &JsValue::from_f64(5.0), &JsValue::NULL)
        .expect("stream")
        .dyn_into::<EventSource>()
        .expect("event source");
    assert!(source.url().ends_with("/api/executions/5/log/stream"));
    source.close();
    host.remove();
}

#[wasm_bindgen_test]
async fn api_call_global_sends_url_objects_and_resolves_null_on_401() {
    let override_key = JsValue::from_str("dashboardConfig");
    let overrides = JSON::parse(r##"{"loginPath":"#signin"}"##).expect("override");
    Reflect::set(&window(), &override_key, &overrides).expect("set override");
    dashboard_ui::run_app();

    let url = Function::new_no_args("return new URL('/api/health', location.origin);")
        .call0(&JsValue::NULL)
        .expect("url");
    {
        let stub = FetchStub::install(200);
        let promise = global_fn("apiCall")
            .call1(&JsValue::NULL, &url)
            .expect("apiCall")
            .dyn_into::<Promise>()
            .expect("promise");
        let response = JsFuture::from(promise).await.expect("resolved");
        assert!(Object::is(&response, &stub.last("response")));
        let input = stub.last("input").as_string().expect("string input");
        assert!(input.ends_with("/api/health"));
        assert!(stub.last("init").is_object());
    }
    {
        let _stub = FetchStub::install(401);
        let promise = global_fn("apiCall")
            .call1(&JsValue::NULL, &JsValue::from_str("/api/items"))
            .expect("apiCall")
            .dyn_into::<Promise>()
            .expect("promise");
        let resolved = JsFuture::from(promise).await.expect("resolved");
        assert!(resolved.is_null());
        assert_eq!(window().location().hash().expect("hash"), "#signin");
    }

    window().location().set_hash("").expect("reset hash");
    Reflect::delete_property(window().unchecked_ref::<Object>(), &override_key)
        .expect("clear override");
}
