//! Log stream state (transport-free).
//!
//! # Design
//! - Payloads are appended in delivery order, never replacing prior output.
//! - The first transport error closes the stream for good; there is no reconnect.
//! - Sinks abstract the target element so ordering and close semantics run in tests.

/// Destination for streamed log text.
pub trait LogSink {
    /// Append a chunk to the accumulated text.
    fn append(&mut self, chunk: &str);

    /// Move the view to the end of the accumulated text.
    fn scroll_to_end(&mut self);
}

/// Lifecycle of a single log stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamPhase {
    /// Receiving messages.
    #[default]
    Open,
    /// Closed by the caller or by a transport error. Terminal.
    Closed,
}

/// Result of handling one inbound message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Payload was appended to the sink.
    Appended,
    /// No target was supplied; the payload was dropped.
    NoTarget,
    /// The stream is closed; the payload was ignored.
    Closed,
}

/// Per-connection state driving a [`LogSink`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogStreamState {
    phase: StreamPhase,
}

impl LogStreamState {
    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> StreamPhase {
        self.phase
    }

    /// Handle an inbound message payload.
    #[must_use]
    pub fn on_message<S: LogSink + ?Sized>(
        &self,
        data: &str,
        sink: Option<&mut S>,
        auto_scroll: bool,
    ) -> MessageOutcome {
        if matches!(self.phase, StreamPhase::Closed) {
            return MessageOutcome::Closed;
        }
        let Some(sink) = sink else {
            return MessageOutcome::NoTarget;
        };
        sink.append(data);
        if auto_scroll {
            sink.scroll_to_end();
        }
        MessageOutcome::Appended
    }

    /// Handle a transport error. Returns `true` when the transport must be closed now.
    pub const fn on_error(&mut self) -> bool {
        let was_open = matches!(self.phase, StreamPhase::Open);
        self.phase = StreamPhase::Closed;
        was_open
    }

    /// Close the stream. Idempotent.
    pub const fn close(&mut self) {
        self.phase = StreamPhase::Closed;
    }
}
