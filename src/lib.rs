//! # citeclip
//!
//! Embeddable components for fetching a citation record (BibTeX) for the paper
//! a user is viewing and placing it on the system clipboard, by bouncing
//! through a third-party scholarly search engine.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Lookup request types
//! - [`resolver`]: Two-stage citation resolution (results page -> export link -> payload)
//! - [`clipboard`]: Clipboard sink behind an injected trait
//! - [`watch`]: Debounced live-page watcher with a periodic fallback
//! - [`augment`]: Button and selection flows wiring the pieces to a host page
//!
//! Host capabilities (network, clipboard, page access, menus, notifications)
//! are injected interfaces, so every component runs and tests without a real
//! browser.

pub mod augment;
pub mod clipboard;
pub mod models;
pub mod resolver;
pub mod watch;

// Re-export commonly used types
pub use augment::{ButtonAugmenter, SelectionAugmenter};
pub use clipboard::{ClipboardWriter, SystemClipboard};
pub use models::LookupRequest;
pub use resolver::{CitationResolver, ResolveError, ResolverConfig};
pub use watch::DomWatcher;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
