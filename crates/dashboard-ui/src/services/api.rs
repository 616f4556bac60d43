//! Authenticated fetch helper.
//!
//! # Design
//! - The caller's options object goes to `fetch` as-is; only its headers gain the
//!   bearer credential, and only when a token is stored.
//! - A 401 navigates to the login page and yields [`ApiOutcome::Redirected`].
//! - No retries or timeouts; network failures surface as [`DashboardError::Fetch`].

use crate::app::preferences;
use crate::core::auth::{HeaderMap, ResponseDisposition, apply_bearer, bearer_value};
use crate::core::config::DashboardConfig;
use crate::core::error::DashboardError;
use gloo::console;
use gloo::utils::window;
use js_sys::{Array, Object, Reflect};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// Result of a completed round-trip.
#[derive(Debug)]
pub enum ApiOutcome {
    /// Raw response for the caller to interpret.
    Response(Response),
    /// The session was unauthorised and the page is navigating to login.
    Redirected,
}

/// Resource handed to `fetch`.
#[derive(Clone, Debug)]
pub enum RequestTarget {
    /// Absolute or page-relative URL.
    Url(String),
    /// Prepared `Request`; the options still apply on top of it.
    Request(Request),
}

/// Fetch wrapper bound to the page configuration.
#[derive(Clone, Debug)]
pub struct ApiClient {
    config: Rc<DashboardConfig>,
}

impl ApiClient {
    /// Client using the given configuration.
    #[must_use]
    pub const fn new(config: Rc<DashboardConfig>) -> Self {
        Self { config }
    }

    /// Issue a request, attaching the stored bearer token when one exists.
    ///
    /// `options` is the caller's `RequestInit`-shaped object. It is mutated in place
    /// (headers only) and passed to `fetch` unchanged otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Fetch`] when the browser rejects the request and
    /// [`DashboardError::Dom`] when the headers cannot be updated.
    #[allow(clippy::future_not_send)]
    pub async fn call(
        &self,
        target: &RequestTarget,
        options: &Object,
    ) -> Result<ApiOutcome, DashboardError> {
        let token = preferences::load_token(&self.config);
        attach_bearer(options, token.as_deref())?;

        let init = options.unchecked_ref::<RequestInit>();
        let pending = match target {
            RequestTarget::Url(url) => window().fetch_with_str_and_init(url, init),
            RequestTarget::Request(request) => window().fetch_with_request_and_init(request, init),
        };
        let response = JsFuture::from(pending)
            .await
            .map_err(|err| DashboardError::Fetch {
                detail: describe(&err),
            })?;
        let response: Response = response.dyn_into().map_err(|err| DashboardError::Fetch {
            detail: describe(&err),
        })?;

        match ResponseDisposition::from_status(response.status()) {
            ResponseDisposition::Unauthorized => {
                if let Err(err) = window().location().set_href(&self.config.login_path) {
                    console::error!("login redirect failed", err);
                }
                Ok(ApiOutcome::Redirected)
            }
            ResponseDisposition::PassThrough => Ok(ApiOutcome::Response(response)),
        }
    }
}

/// Put the bearer header on `options.headers`, creating a plain object when unset.
fn attach_bearer(options: &Object, token: Option<&str>) -> Result<(), DashboardError> {
    if bearer_value(token).is_none() {
        return Ok(());
    }
    let key = JsValue::from_str("headers");
    let mut headers =
        Reflect::get(options, &key).map_err(|err| dom_error("read options.headers", &err))?;
    if !headers.is_truthy() {
        headers = Object::new().into();
        Reflect::set(options, &key, &headers)
            .map_err(|err| dom_error("write options.headers", &err))?;
    }

    if let Some(fetch_headers) = headers.dyn_ref::<Headers>() {
        apply_bearer(&mut FetchHeaders(fetch_headers.clone()), token)?;
    } else if Array::is_array(&headers) {
        apply_bearer(&mut PairHeaders(headers.unchecked_into()), token)?;
    } else {
        apply_bearer(&mut PlainHeaders(headers.unchecked_into()), token)?;
    }
    Ok(())
}

/// `Headers` instance; names are already case-insensitive.
struct FetchHeaders(Headers);

impl HeaderMap for FetchHeaders {
    fn header_names(&self) -> Vec<String> {
        if matches!(self.0.has("authorization"), Ok(true)) {
            vec!["authorization".to_string()]
        } else {
            Vec::new()
        }
    }

    fn remove_header(&mut self, name: &str) -> Result<(), DashboardError> {
        self.0
            .delete(name)
            .map_err(|err| dom_error("headers.delete", &err))
    }

    fn insert_header(&mut self, name: &str, value: &str) -> Result<(), DashboardError> {
        self.0
            .set(name, value)
            .map_err(|err| dom_error("headers.set", &err))
    }
}

/// `[[name, value], ...]` header list.
struct PairHeaders(Array);

impl PairHeaders {
    fn name_of(pair: &JsValue) -> Option<String> {
        pair.dyn_ref::<Array>()
            .and_then(|pair| pair.get(0).as_string())
    }
}

impl HeaderMap for PairHeaders {
    fn header_names(&self) -> Vec<String> {
        self.0.iter().filter_map(|pair| Self::name_of(&pair)).collect()
    }

    fn remove_header(&mut self, name: &str) -> Result<(), DashboardError> {
        let kept: Vec<JsValue> = self
            .0
            .iter()
            .filter(|pair| Self::name_of(pair).as_deref() != Some(name))
            .collect();
        self.0.set_length(0);
        for pair in &kept {
            self.0.push(pair);
        }
        Ok(())
    }

    fn insert_header(&mut self, name: &str, value: &str) -> Result<(), DashboardError> {
        self.0
            .push(&Array::of2(&JsValue::from_str(name), &JsValue::from_str(value)));
        Ok(())
    }
}

/// Plain `{ name: value }` record.
struct PlainHeaders(Object);

impl HeaderMap for PlainHeaders {
    fn header_names(&self) -> Vec<String> {
        Object::keys(&self.0)
            .iter()
            .filter_map(|key| key.as_string())
            .collect()
    }

    fn remove_header(&mut self, name: &str) -> Result<(), DashboardError> {
        Reflect::delete_property(&self.0, &JsValue::from_str(name))
            .map(|_| ())
            .map_err(|err| dom_error("delete header", &err))
    }

    fn insert_header(&mut self, name: &str, value: &str) -> Result<(), DashboardError> {
        Reflect::set(&self.0, &JsValue::from_str(name), &JsValue::from_str(value))
            .map(|_| ())
            .map_err(|err| dom_error("set header", &err))
    }
}

fn dom_error(operation: &'static str, err: &JsValue) -> DashboardError {
    DashboardError::Dom {
        operation,
        detail: describe(err),
    }
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
