//! Widgets bound to the server-rendered page.

pub mod confirm_modal;
pub mod theme_toggle;
