//! Selection-triggered lookup via a transient context menu.

use std::sync::{Arc, Mutex};

use crate::augment::feedback::{NoticeKind, Notifier};
use crate::clipboard::ClipboardWriter;
use crate::models::LookupRequest;
use crate::resolver::CitationResolver;

/// Pointer offset at which the menu is anchored, in viewport pixels.
const MENU_OFFSET: (i32, i32) = (5, -20);

/// What the host should do with the native context-menu event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuDecision {
    /// Selection too short; let the native menu through unmodified.
    PassThrough,
    /// Native menu suppressed; the transient menu has been requested.
    Intercept,
}

/// Host-rendered single-item menu shown at the pointer.
///
/// The host is expected to attach a one-shot outside-click listener after
/// showing the menu and route it to [`SelectionAugmenter::on_outside_click`].
pub trait MenuHost: Send + Sync {
    /// Show the menu at the given viewport position.
    fn show_menu(&self, x: i32, y: i32, label: &str);

    /// Remove the menu if present.
    fn remove_menu(&self);
}

/// Serves context-menu lookups for the current text selection.
///
/// The augmenter listens at the capturing phase, ahead of page-native
/// handlers, so it can decide whether to suppress the native menu before the
/// page sees the event.
pub struct SelectionAugmenter {
    resolver: CitationResolver,
    menu: Arc<dyn MenuHost>,
    clipboard: Arc<dyn ClipboardWriter>,
    notifier: Arc<dyn Notifier>,
    menu_label: String,
    /// Request captured when the menu was shown, consumed by the item click.
    pending: Mutex<Option<LookupRequest>>,
}

impl SelectionAugmenter {
    pub fn new(
        resolver: CitationResolver,
        menu: Arc<dyn MenuHost>,
        clipboard: Arc<dyn ClipboardWriter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            resolver,
            menu,
            clipboard,
            notifier,
            menu_label: "Copy BibTeX".to_string(),
            pending: Mutex::new(None),
        }
    }

    /// Handle a context-menu event, given the current selection and pointer
    /// position.
    ///
    /// Returns [`MenuDecision::PassThrough`] when the trimmed selection is too
    /// short to search, leaving the native menu untouched. Otherwise the
    /// transient menu is requested at the offset pointer position and the host
    /// must suppress its native menu.
    pub fn on_context_menu(&self, selection: &str, x: i32, y: i32) -> MenuDecision {
        let Some(request) = LookupRequest::free_text(selection) else {
            return MenuDecision::PassThrough;
        };

        *self.pending.lock().unwrap() = Some(request);
        self.menu
            .show_menu(x + MENU_OFFSET.0, y + MENU_OFFSET.1, &self.menu_label);
        MenuDecision::Intercept
    }

    /// Serve a click on the menu item.
    ///
    /// The menu is removed before the lookup starts; the outcome is surfaced
    /// as a blocking acknowledgement. A lookup already in flight is never
    /// cancelled, so a later completion may overwrite earlier feedback.
    pub async fn on_menu_click(&self) {
        self.menu.remove_menu();

        let Some(request) = self.pending.lock().unwrap().take() else {
            return;
        };

        let copied = match self.resolver.resolve(&request).await {
            Ok(payload) => self
                .clipboard
                .write_text(&payload)
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match copied {
            Ok(()) => self
                .notifier
                .acknowledge("BibTeX copied to clipboard", NoticeKind::Success),
            Err(reason) => {
                tracing::warn!(%reason, "selection lookup failed");
                self.notifier.acknowledge(
                    &format!("Failed to get BibTeX: {reason}"),
                    NoticeKind::Failure,
                );
            }
        }
    }

    /// The user clicked outside the menu; hosts call this from their one-shot
    /// outside-click listener.
    pub fn on_outside_click(&self) {
        self.pending.lock().unwrap().take();
        self.menu.remove_menu();
    }
}
