//! Execution log streaming over `EventSource`.
//!
//! # Design
//! - One connection per call. The listeners own the connection state and are released
//!   when the stream closes, so nothing outlives a closed source.
//! - Each message is appended to the target element in delivery order.
//! - The first transport error closes the source. No reconnect.

use crate::app::preferences;
use crate::core::config::DashboardConfig;
use crate::core::error::DashboardError;
use crate::core::log_stream::{LogSink, LogStreamState, MessageOutcome};
use gloo::console;
use gloo::events::EventListener;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{EventSource, HtmlElement, MessageEvent};

/// Appends to an element's text content.
struct ElementSink(HtmlElement);

impl LogSink for ElementSink {
    fn append(&mut self, chunk: &str) {
        let mut text = self.0.text_content().unwrap_or_default();
        text.push_str(chunk);
        self.0.set_text_content(Some(&text));
    }

    fn scroll_to_end(&mut self) {
        self.0.set_scroll_top(self.0.scroll_height());
    }
}

/// State and handlers shared by one connection's listeners.
struct StreamShared {
    state: RefCell<LogStreamState>,
    listeners: RefCell<Vec<EventListener>>,
}

impl StreamShared {
    /// Detach the handlers. They are dropped on a later tick because this may run
    /// inside one of them.
    fn release(&self) {
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        if !listeners.is_empty() {
            spawn_local(async move { drop(listeners) });
        }
    }
}

/// Live log connection.
///
/// The handlers stay attached until the first transport error or [`Self::close`];
/// dropping the handle does neither.
pub struct LogStreamHandle {
    source: EventSource,
    shared: Rc<StreamShared>,
}

impl LogStreamHandle {
    /// Close the connection and detach its handlers. Idempotent.
    pub fn close(&self) {
        self.shared.state.borrow_mut().close();
        self.source.close();
        self.shared.release();
    }

    /// Underlying source, handed to JS callers of `streamLog`.
    #[must_use]
    pub const fn source(&self) -> &EventSource {
        &self.source
    }
}

/// Open the log stream for `exec_id`, appending each message to `target`.
///
/// # Errors
///
/// Returns [`DashboardError::Dom`] when the browser refuses to create the source.
pub fn stream_log(
    config: &DashboardConfig,
    exec_id: &str,
    target: Option<HtmlElement>,
) -> Result<LogStreamHandle, DashboardError> {
    let url = config.log_stream_path(exec_id);
    let source = EventSource::new(&url).map_err(|err| DashboardError::Dom {
        operation: "new EventSource",
        detail: format!("{err:?}"),
    })?;
    let shared = Rc::new(StreamShared {
        state: RefCell::new(LogStreamState::default()),
        listeners: RefCell::new(Vec::new()),
    });

    let on_message = {
        let shared = Rc::clone(&shared);
        let config = config.clone();
        EventListener::new(&source, "message", move |event| {
            let Some(message) = event.dyn_ref::<MessageEvent>() else {
                return;
            };
            let data = message.data().as_string().unwrap_or_default();
            let mut sink = target.clone().map(ElementSink);
            let auto_scroll = preferences::auto_scroll_enabled(&config);
            let outcome = shared
                .state
                .borrow()
                .on_message(&data, sink.as_mut(), auto_scroll);
            if outcome == MessageOutcome::Closed {
                console::debug!("log message after close ignored");
            }
        })
    };

    let on_error = {
        let shared = Rc::clone(&shared);
        let connection = source.clone();
        EventListener::new(&source, "error", move |_| {
            if shared.state.borrow_mut().on_error() {
                connection.close();
                shared.release();
                console::debug!("log stream closed after transport error", connection.url());
            }
        })
    };
    shared
        .listeners
        .borrow_mut()
        .extend([on_message, on_error]);

    Ok(LogStreamHandle { source, shared })
}
