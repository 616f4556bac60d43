//! Authentication primitives for outbound API calls.
//!
//! # Design
//! - The caller's request options are mutated in place, never rebuilt; only the
//!   authorization header is touched.
//! - Treat an empty token as unauthenticated at the call site.
//! - A 401 is a navigation outcome, never an error.

use crate::core::error::DashboardError;
use std::collections::BTreeMap;

/// Header carrying the bearer credential.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Mutable view over a request's headers, whatever shape the caller used.
pub trait HeaderMap {
    /// Header names as currently spelled by the caller.
    fn header_names(&self) -> Vec<String>;

    /// Remove the header with exactly this name.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying container rejects the removal.
    fn remove_header(&mut self, name: &str) -> Result<(), DashboardError>;

    /// Insert or overwrite a header.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying container rejects the write.
    fn insert_header(&mut self, name: &str, value: &str) -> Result<(), DashboardError>;
}

impl HeaderMap for BTreeMap<String, String> {
    fn header_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn remove_header(&mut self, name: &str) -> Result<(), DashboardError> {
        self.remove(name);
        Ok(())
    }

    fn insert_header(&mut self, name: &str, value: &str) -> Result<(), DashboardError> {
        self.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// `Bearer <token>` for a usable token.
#[must_use]
pub fn bearer_value(token: Option<&str>) -> Option<String> {
    token
        .filter(|token| !token.is_empty())
        .map(|token| format!("Bearer {token}"))
}

/// Attach `Authorization: Bearer <token>`, replacing any existing authorization header.
///
/// Header names compare case-insensitively. Returns `false` and leaves the headers
/// untouched when the token is absent or empty.
///
/// # Errors
///
/// Propagates failures of the underlying header container.
pub fn apply_bearer<H: HeaderMap + ?Sized>(
    headers: &mut H,
    token: Option<&str>,
) -> Result<bool, DashboardError> {
    let Some(value) = bearer_value(token) else {
        return Ok(false);
    };
    for name in headers.header_names() {
        if name.eq_ignore_ascii_case(AUTHORIZATION_HEADER) {
            headers.remove_header(&name)?;
        }
    }
    headers.insert_header(AUTHORIZATION_HEADER, &value)?;
    Ok(true)
}

/// What the fetch helper does with a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseDisposition {
    /// Session is not authorised; navigate to the login page.
    Unauthorized,
    /// Hand the response to the caller untouched.
    PassThrough,
}

impl ResponseDisposition {
    /// Classify a status code. Only 401 is intercepted.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        if status == 401 {
            Self::Unauthorized
        } else {
            Self::PassThrough
        }
    }
}
