//! Confirmation modal state machine.
//!
//! # Design
//! - Two states, hidden and visible; the painter reads [`ConfirmModal::visibility`]
//!   instead of inspecting the DOM.
//! - At most one pending callback. Showing again replaces it without running it.
//! - Confirm clears state before handing the callback back, so the callback may
//!   panic or open another confirmation without leaving the modal half torn down.

use std::fmt;

/// Callback run when the user confirms.
pub type ConfirmCallback = Box<dyn FnOnce()>;

/// Modal visibility.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModalVisibility {
    /// Not shown (initial).
    #[default]
    Hidden,
    /// Shown and awaiting a decision.
    Visible,
}

impl ModalVisibility {
    /// CSS `display` value that paints this state.
    #[must_use]
    pub const fn display_value(self) -> &'static str {
        match self {
            Self::Hidden => "none",
            Self::Visible => "flex",
        }
    }
}

/// Shared confirmation modal state.
#[derive(Default)]
pub struct ConfirmModal {
    visibility: ModalVisibility,
    title: String,
    message: String,
    pending: Option<ConfirmCallback>,
}

impl fmt::Debug for ConfirmModal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmModal")
            .field("visibility", &self.visibility)
            .field("title", &self.title)
            .field("message", &self.message)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

impl ConfirmModal {
    /// Current visibility.
    #[must_use]
    pub const fn visibility(&self) -> ModalVisibility {
        self.visibility
    }

    /// Title of the most recent request.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Message of the most recent request.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether a confirmation callback is waiting.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Open the modal for a new request, replacing any pending callback unrun.
    pub fn show(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        on_confirm: Option<ConfirmCallback>,
    ) {
        self.title = title.into();
        self.message = message.into();
        self.pending = on_confirm;
        self.visibility = ModalVisibility::Visible;
    }

    /// Hide the modal and hand back the pending callback for the caller to run.
    #[must_use = "the returned callback must be invoked to complete the confirmation"]
    pub const fn confirm(&mut self) -> Option<ConfirmCallback> {
        self.visibility = ModalVisibility::Hidden;
        self.pending.take()
    }

    /// Hide the modal and drop the pending callback without running it.
    ///
    /// Cancel, backdrop clicks, Escape and programmatic hides all land here.
    pub fn dismiss(&mut self) {
        self.visibility = ModalVisibility::Hidden;
        self.pending = None;
    }

    /// Handle a key press. Returns `true` when it dismissed the modal.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if key == "Escape" && self.visibility == ModalVisibility::Visible {
            self.dismiss();
            return true;
        }
        false
    }
}
