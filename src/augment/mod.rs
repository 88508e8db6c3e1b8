//! Page augmentation flows built on the resolver, clipboard, and watcher.
//!
//! Two flows share the same plumbing: [`ButtonAugmenter`] attaches a copy
//! action next to discovered external-search anchors, [`SelectionAugmenter`]
//! offers the same action for the current text selection through a transient
//! context menu. Host capabilities are injected via the [`Page`], [`Notifier`],
//! and [`MenuHost`] traits.

mod button;
mod feedback;
mod page;
mod selection;

pub mod mock;

pub use button::{ButtonAugmenter, ScanConfig};
pub use feedback::{NoticeKind, Notifier};
pub use page::{Anchor, AnchorId, Page};
pub use selection::{MenuDecision, MenuHost, SelectionAugmenter};
