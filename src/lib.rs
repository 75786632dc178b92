//! Host settings reconciliation for a media-center addon.
//!
//! Raw, string-typed settings from the host are validated, coerced and
//! augmented with derived values, then published as one immutable
//! [`config::Configuration`] snapshot that any thread can read.

pub mod bootstrap;
pub mod config;
pub mod health;
pub mod host;
pub mod logging;
