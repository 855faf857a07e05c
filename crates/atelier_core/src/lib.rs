//! # Atelier Core
//!
//! Shared value types for the Atelier configurator: the fixed set of
//! configurable product parts, linear RGBA colors, and the
//! configuration store that maps parts to colors and notifies
//! subscribers on every change.
//!
//! The store is deliberately synchronous and single-threaded: the
//! whole engine runs on one UI thread, so a `set` call notifies every
//! subscriber before it returns and no locking is involved.

mod color;
mod part;
mod store;

pub use color::Color;
pub use part::{Part, PartColors};
pub use store::{ConfigStore, SubscriberId};

use thiserror::Error;

/// Errors produced by configuration input
///
/// Both variants are diagnostic: the offending input is ignored and
/// the store is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The part name is not one of the fixed configurable parts
    #[error("unknown part: {0:?}")]
    UnknownPart(String),

    /// The color string is not a `#rgb` or `#rrggbb` hex value
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
}
