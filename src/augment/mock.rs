//! Mock host implementations for testing purposes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::augment::feedback::{NoticeKind, Notifier};
use crate::augment::page::{Anchor, AnchorId, Page};
use crate::augment::selection::MenuHost;
use crate::clipboard::{ClipboardError, ClipboardWriter};

/// A scriptable page: a fixed anchor list plus recorded action bookkeeping.
#[derive(Debug, Default)]
pub struct FakePage {
    anchors: Mutex<Vec<Anchor>>,
    actions: Mutex<Vec<AnchorId>>,
    attach_count: Mutex<usize>,
    busy_log: Mutex<Vec<(AnchorId, bool)>>,
}

impl FakePage {
    pub fn new(anchors: Vec<Anchor>) -> Self {
        Self {
            anchors: Mutex::new(anchors),
            ..Self::default()
        }
    }

    /// Replace the anchor list, as if the page re-rendered.
    pub fn set_anchors(&self, anchors: Vec<Anchor>) {
        *self.anchors.lock().unwrap() = anchors;
    }

    /// Anchor ids that currently carry an action, in attachment order.
    pub fn actions(&self) -> Vec<AnchorId> {
        self.actions.lock().unwrap().clone()
    }

    /// Total number of attach calls, counting duplicates.
    pub fn attach_count(&self) -> usize {
        *self.attach_count.lock().unwrap()
    }

    /// Busy-state transitions recorded for one anchor.
    pub fn busy_transitions(&self, id: AnchorId) -> Vec<bool> {
        self.busy_log
            .lock()
            .unwrap()
            .iter()
            .filter(|(anchor, _)| *anchor == id)
            .map(|(_, busy)| *busy)
            .collect()
    }
}

impl Page for FakePage {
    fn anchors(&self) -> Vec<Anchor> {
        self.anchors.lock().unwrap().clone()
    }

    fn has_action(&self, id: AnchorId) -> bool {
        self.actions.lock().unwrap().contains(&id)
    }

    fn attach_action(&self, id: AnchorId, _label: &str) {
        *self.attach_count.lock().unwrap() += 1;
        let mut actions = self.actions.lock().unwrap();
        if !actions.contains(&id) {
            actions.push(id);
        }
    }

    fn set_action_busy(&self, id: AnchorId, busy: bool) {
        self.busy_log.lock().unwrap().push((id, busy));
    }
}

/// A clipboard that records writes, optionally rejecting them.
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    writes: Mutex<Vec<String>>,
    reject: AtomicBool,
}

impl RecordingClipboard {
    /// Make every subsequent write fail.
    pub fn reject_writes(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

impl ClipboardWriter for RecordingClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(ClipboardError::Write("rejected by test".to_string()));
        }
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// A notifier that records every notice and acknowledgement.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(String, NoticeKind)>>,
    acks: Mutex<Vec<(String, NoticeKind)>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<(String, NoticeKind)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn acks(&self) -> Vec<(String, NoticeKind)> {
        self.acks.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, kind: NoticeKind) {
        self.notices.lock().unwrap().push((message.to_string(), kind));
    }

    fn acknowledge(&self, message: &str, kind: NoticeKind) {
        self.acks.lock().unwrap().push((message.to_string(), kind));
    }
}

/// A menu host that records show/remove calls.
#[derive(Debug, Default)]
pub struct RecordingMenu {
    shown: Mutex<Vec<(i32, i32, String)>>,
    removals: Mutex<usize>,
}

impl RecordingMenu {
    pub fn shown(&self) -> Vec<(i32, i32, String)> {
        self.shown.lock().unwrap().clone()
    }

    pub fn removals(&self) -> usize {
        *self.removals.lock().unwrap()
    }
}

impl MenuHost for RecordingMenu {
    fn show_menu(&self, x: i32, y: i32, label: &str) {
        self.shown.lock().unwrap().push((x, y, label.to_string()));
    }

    fn remove_menu(&self) {
        *self.removals.lock().unwrap() += 1;
    }
}
