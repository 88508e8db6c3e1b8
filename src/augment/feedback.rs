//! User feedback seam.

/// Tone of a feedback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// Host-rendered user feedback. Styling, placement, and dismissal timing all
/// belong to the host.
pub trait Notifier: Send + Sync {
    /// Show a transient, non-blocking notice.
    fn notify(&self, message: &str, kind: NoticeKind);

    /// Surface a message the user must dismiss before continuing.
    fn acknowledge(&self, message: &str, kind: NoticeKind);
}
