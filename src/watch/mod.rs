//! Live page watching: debounced mutation-driven rescans with a periodic
//! fallback.
//!
//! Two independent event sources feed one callback. Mutation batches that might
//! introduce anchors are coalesced through a single-slot debounce timer, so a
//! burst of churn from one page update yields one rescan. Independently, a
//! fixed-interval tick invokes the callback unconditionally, covering hosts
//! whose mutation feed is missing or unreliable. The callback must therefore be
//! idempotent; overlapping invocations are expected.

mod mutation;

pub use mutation::{AddedNode, MutationBatch};

use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};

/// Quiet period after an anchor-bearing insertion before a rescan fires.
pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// Unconditional rescan interval.
pub const RESCAN_INTERVAL: Duration = Duration::from_millis(3000);

/// Watches a page session for content changes and schedules rescans.
///
/// One watcher per page session. [`DomWatcher::start`] is idempotent while the
/// watcher is running; the watcher otherwise runs for the lifetime of the page
/// and needs no teardown in production hosts. [`DomWatcher::stop`] exists for
/// tests.
#[derive(Debug)]
pub struct DomWatcher {
    task: Mutex<Option<JoinHandle<()>>>,
    debounce: Duration,
    rescan_interval: Duration,
}

impl DomWatcher {
    /// Watcher with the standard timing.
    pub fn new() -> Self {
        Self::with_timing(DEBOUNCE, RESCAN_INTERVAL)
    }

    /// Watcher with custom timing, for tests and unusual hosts.
    pub fn with_timing(debounce: Duration, rescan_interval: Duration) -> Self {
        Self {
            task: Mutex::new(None),
            debounce,
            rescan_interval,
        }
    }

    /// Begin watching. A no-op if the watcher is already running.
    ///
    /// `mutations` is the host's feed of subtree mutation batches;
    /// `on_possible_change` runs on the watcher task after the debounce period
    /// of a qualifying batch, and unconditionally on every fallback tick. Must
    /// be called from within a tokio runtime.
    pub fn start<F>(&self, mutations: mpsc::UnboundedReceiver<MutationBatch>, on_possible_change: F)
    where
        F: Fn() + Send + 'static,
    {
        let mut guard = self.task.lock().unwrap();
        if let Some(task) = guard.as_ref() {
            if !task.is_finished() {
                tracing::debug!("watcher already running, start ignored");
                return;
            }
        }

        let debounce = self.debounce;
        let every = self.rescan_interval;
        *guard = Some(tokio::spawn(run(
            mutations,
            debounce,
            every,
            on_possible_change,
        )));
    }

    /// Whether the background task is currently running.
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Tear the watcher down. Production hosts discard the watcher on
    /// navigation instead.
    pub fn stop(&self) {
        if let Some(task) = self.task.lock().unwrap().take() {
            task.abort();
        }
    }
}

impl Default for DomWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DomWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run<F>(
    mut mutations: mpsc::UnboundedReceiver<MutationBatch>,
    debounce: Duration,
    every: Duration,
    on_possible_change: F,
) where
    F: Fn() + Send + 'static,
{
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of an interval completes immediately; the fallback should
    // first fire one full period in.
    ticker.tick().await;

    // Single-slot pending timer: re-armed, not queued, by later batches.
    let mut pending: Option<Instant> = None;
    let mut feed_open = true;

    loop {
        let deadline = pending;
        let debounce_due = async move {
            match deadline {
                Some(at) => sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            batch = mutations.recv(), if feed_open => match batch {
                Some(batch) if batch.introduces_anchor() => {
                    pending = Some(Instant::now() + debounce);
                }
                Some(_) => {}
                None => feed_open = false,
            },
            _ = debounce_due => {
                pending = None;
                tracing::debug!("debounced rescan");
                on_possible_change();
            }
            _ = ticker.tick() => {
                tracing::trace!("periodic rescan");
                on_possible_change();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::{advance, sleep};

    fn counting_callback() -> (Arc<AtomicUsize>, impl Fn() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let cb_count = Arc::clone(&count);
        (count, move || {
            cb_count.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn anchor_batch() -> MutationBatch {
        MutationBatch::new(vec![AddedNode::element("a", false)])
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_batches_coalesces_to_one_rescan() {
        let watcher = DomWatcher::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let (count, callback) = counting_callback();
        watcher.start(rx, callback);

        for _ in 0..5 {
            tx.send(anchor_batch()).unwrap();
        }
        // Let the watcher drain the burst, then not quite reach the deadline
        sleep(Duration::from_millis(499)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        watcher.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_batch_rearms_the_pending_timer() {
        let watcher = DomWatcher::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let (count, callback) = counting_callback();
        watcher.start(rx, callback);

        tx.send(anchor_batch()).unwrap();
        sleep(Duration::from_millis(300)).await;
        tx.send(anchor_batch()).unwrap();

        // 550ms after the first batch, but only 250ms after the second
        sleep(Duration::from_millis(250)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(251)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        watcher.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_irrelevant_batches_do_not_schedule() {
        let watcher = DomWatcher::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let (count, callback) = counting_callback();
        watcher.start(rx, callback);

        tx.send(MutationBatch::new(vec![
            AddedNode::Text,
            AddedNode::element("span", false),
        ]))
        .unwrap();
        sleep(Duration::from_millis(1000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        watcher.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_fallback_fires_without_mutations() {
        let watcher = DomWatcher::new();
        let (_tx, rx) = mpsc::unbounded_channel();
        let (count, callback) = counting_callback();
        watcher.start(rx, callback);

        sleep(Duration::from_millis(2999)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        sleep(Duration::from_millis(3000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        watcher.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_fallback_survives_closed_feed() {
        let watcher = DomWatcher::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let (count, callback) = counting_callback();
        watcher.start(rx, callback);

        drop(tx);
        sleep(Duration::from_millis(3001)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        watcher.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent_while_running() {
        let watcher = DomWatcher::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let (count, callback) = counting_callback();
        watcher.start(rx, callback);
        assert!(watcher.is_running());

        // Second start is ignored; its feed and callback are dropped
        let (_tx2, rx2) = mpsc::unbounded_channel();
        let (count2, callback2) = counting_callback();
        watcher.start(rx2, callback2);

        tx.send(anchor_batch()).unwrap();
        sleep(Duration::from_millis(501)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(count2.load(Ordering::SeqCst), 0);

        watcher.stop();
        assert!(!watcher.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_rescans() {
        let watcher = DomWatcher::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let (count, callback) = counting_callback();
        watcher.start(rx, callback);

        watcher.stop();
        // Aborting is asynchronous; give the runtime a turn
        advance(Duration::from_millis(1)).await;

        // The aborted task dropped its receiver, so the send may fail
        let _ = tx.send(anchor_batch());
        sleep(Duration::from_millis(4000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_stop() {
        let watcher = DomWatcher::new();
        let (_tx, rx) = mpsc::unbounded_channel();
        let (count, callback) = counting_callback();
        watcher.start(rx, callback);
        watcher.stop();

        let (tx2, rx2) = mpsc::unbounded_channel();
        let (count2, callback2) = counting_callback();
        watcher.start(rx2, callback2);
        assert!(watcher.is_running());

        tx2.send(anchor_batch()).unwrap();
        sleep(Duration::from_millis(501)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(count2.load(Ordering::SeqCst), 1);

        watcher.stop();
    }
}
