//! Host-page seam: anchor discovery and action-element bookkeeping.

/// Identity of an anchor element within the page, assigned by the host.
pub type AnchorId = u64;

/// Snapshot of an anchor element as reported by the host page.
#[derive(Debug, Clone)]
pub struct Anchor {
    pub id: AnchorId,
    /// Outbound destination, already resolved to an absolute URL by the host.
    /// Empty when the anchor has none.
    pub href: String,
    /// `title` attribute, empty when absent.
    pub title: String,
    /// Visible text content.
    pub text: String,
}

/// Read/write access to the live page, supplied by the host environment.
///
/// Element lifetimes belong to the host: anchors removed from the document
/// simply stop appearing in [`Page::anchors`], and any action attached to them
/// goes away with their parent. Nothing here needs explicit cleanup.
pub trait Page: Send + Sync {
    /// Anchor elements currently attached to the document, in document order.
    fn anchors(&self) -> Vec<Anchor>;

    /// Whether a copy action is already attached after this anchor.
    fn has_action(&self, id: AnchorId) -> bool;

    /// Insert a copy action labeled `label` immediately following the anchor.
    /// The new element belongs to the anchor's parent.
    fn attach_action(&self, id: AnchorId, label: &str);

    /// While `busy`, the action is disabled and shows a loading label; when
    /// `busy` ends, the action is re-enabled with its original label restored.
    fn set_action_busy(&self, id: AnchorId, busy: bool);
}
