//! Copy actions attached next to external scholarly search anchors.

use std::collections::HashSet;
use std::sync::Arc;

use crate::augment::feedback::{NoticeKind, Notifier};
use crate::augment::page::{Anchor, Page};
use crate::clipboard::ClipboardWriter;
use crate::models::LookupRequest;
use crate::resolver::CitationResolver;

/// Heuristics for spotting "search this paper on the external engine" anchors.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Substring matched against anchor destinations.
    pub href_pattern: String,
    /// Substring matched against anchor `title` attributes.
    pub title_pattern: String,
    /// Substring matched against anchor visible text.
    pub text_pattern: String,
    /// Label for attached copy actions.
    pub action_label: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            href_pattern: "scholar.google.com".to_string(),
            title_pattern: "Google Scholar".to_string(),
            text_pattern: "Google Scholar".to_string(),
            action_label: "Copy BibTeX".to_string(),
        }
    }
}

impl ScanConfig {
    /// Whether this anchor looks like an external scholarly search action.
    fn matches(&self, anchor: &Anchor) -> bool {
        anchor.href.contains(&self.href_pattern)
            || anchor.title.contains(&self.title_pattern)
            || anchor.text.contains(&self.text_pattern)
    }
}

/// Attaches copy actions to matching anchors and serves their clicks.
pub struct ButtonAugmenter {
    resolver: CitationResolver,
    page: Arc<dyn Page>,
    clipboard: Arc<dyn ClipboardWriter>,
    notifier: Arc<dyn Notifier>,
    scan: ScanConfig,
}

impl ButtonAugmenter {
    pub fn new(
        resolver: CitationResolver,
        page: Arc<dyn Page>,
        clipboard: Arc<dyn ClipboardWriter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::with_scan_config(resolver, page, clipboard, notifier, ScanConfig::default())
    }

    pub fn with_scan_config(
        resolver: CitationResolver,
        page: Arc<dyn Page>,
        clipboard: Arc<dyn ClipboardWriter>,
        notifier: Arc<dyn Notifier>,
        scan: ScanConfig,
    ) -> Self {
        Self {
            resolver,
            page,
            clipboard,
            notifier,
            scan,
        }
    }

    /// Discover eligible anchors and attach a copy action to each one that
    /// lacks one. Safe to invoke repeatedly and from overlapping schedules:
    /// already-augmented anchors are skipped, so a rescan of an unchanged page
    /// is a no-op.
    pub fn scan(&self) {
        let mut seen = HashSet::new();
        for anchor in self.page.anchors() {
            if !seen.insert(anchor.id) {
                continue;
            }
            if !self.scan.matches(&anchor) {
                continue;
            }
            if self.page.has_action(anchor.id) {
                continue;
            }
            tracing::debug!(anchor = anchor.id, href = %anchor.href, "attaching copy action");
            self.page.attach_action(anchor.id, &self.scan.action_label);
        }
    }

    /// Serve a click on the copy action attached to `anchor`.
    ///
    /// The action is disabled for the duration of the lookup and re-enabled on
    /// every exit path. In-flight lookups are never cancelled: if the user
    /// clicks again before the first lookup lands, the later completion
    /// overwrites the earlier feedback.
    pub async fn handle_click(&self, anchor: &Anchor) {
        if anchor.href.is_empty() {
            self.notifier
                .notify("Search link has no destination", NoticeKind::Failure);
            return;
        }

        let request = LookupRequest::direct_link(&anchor.href);
        self.page.set_action_busy(anchor.id, true);
        let outcome = self.resolver.resolve(&request).await;
        self.page.set_action_busy(anchor.id, false);

        let copied = outcome.map_err(|e| e.to_string()).and_then(|payload| {
            self.clipboard
                .write_text(&payload)
                .map_err(|e| e.to_string())
        });

        match copied {
            Ok(()) => self
                .notifier
                .notify("BibTeX copied to clipboard", NoticeKind::Success),
            Err(reason) => {
                tracing::warn!(%reason, "copy action failed");
                self.notifier.notify(
                    &format!("Failed to get BibTeX: {reason}"),
                    NoticeKind::Failure,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augment::mock::{FakePage, RecordingClipboard, RecordingNotifier};
    use crate::resolver::{FetchResponse, Fetcher};
    use async_trait::async_trait;

    const RESULTS_PAGE: &str =
        r#"<html><body><a href="https://x/scholar.bib?q=1">Import into BibTeX</a></body></html>"#;

    /// Always resolves the two-stage lookup to `@article{ok}`.
    #[derive(Debug)]
    struct HappyFetcher;

    #[async_trait]
    impl Fetcher for HappyFetcher {
        async fn get(
            &self,
            url: &str,
            _user_agent: Option<&str>,
        ) -> Result<FetchResponse, crate::resolver::FetchError> {
            let body = if url.contains("scholar.bib") {
                "@article{ok}\n"
            } else {
                RESULTS_PAGE
            };
            Ok(FetchResponse {
                status: 200,
                body: body.to_string(),
            })
        }
    }

    /// Results page never contains an export link.
    #[derive(Debug)]
    struct BareFetcher;

    #[async_trait]
    impl Fetcher for BareFetcher {
        async fn get(
            &self,
            _url: &str,
            _user_agent: Option<&str>,
        ) -> Result<FetchResponse, crate::resolver::FetchError> {
            Ok(FetchResponse {
                status: 200,
                body: "<html><body>no links</body></html>".to_string(),
            })
        }
    }

    fn scholar_anchor(id: u64) -> Anchor {
        Anchor {
            id,
            href: format!("https://scholar.google.com/scholar?cluster={id}"),
            title: String::new(),
            text: "Google Scholar".to_string(),
        }
    }

    fn augmenter(
        fetcher: Arc<dyn Fetcher>,
        anchors: Vec<Anchor>,
    ) -> (
        ButtonAugmenter,
        Arc<FakePage>,
        Arc<RecordingClipboard>,
        Arc<RecordingNotifier>,
    ) {
        let page = Arc::new(FakePage::new(anchors));
        let clipboard = Arc::new(RecordingClipboard::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let augmenter = ButtonAugmenter::new(
            CitationResolver::new(fetcher),
            Arc::clone(&page) as Arc<dyn Page>,
            Arc::clone(&clipboard) as Arc<dyn ClipboardWriter>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
        );
        (augmenter, page, clipboard, notifier)
    }

    #[test]
    fn test_scan_attaches_one_action_per_match() {
        let plain = Anchor {
            id: 7,
            href: "https://example.com/about".to_string(),
            title: String::new(),
            text: "About".to_string(),
        };
        let (augmenter, page, _, _) = augmenter(
            Arc::new(HappyFetcher),
            vec![scholar_anchor(1), plain, scholar_anchor(2)],
        );

        augmenter.scan();
        assert_eq!(page.actions(), vec![1, 2]);
    }

    #[test]
    fn test_scan_is_idempotent_on_unchanged_page() {
        let (augmenter, page, _, _) = augmenter(Arc::new(HappyFetcher), vec![scholar_anchor(1)]);

        augmenter.scan();
        augmenter.scan();
        assert_eq!(page.actions(), vec![1]);
        assert_eq!(page.attach_count(), 1);
    }

    #[test]
    fn test_scan_matches_by_title_and_text_too() {
        let by_title = Anchor {
            id: 1,
            href: "https://example.com/out".to_string(),
            title: "View in Google Scholar".to_string(),
            text: String::new(),
        };
        let by_text = Anchor {
            id: 2,
            href: "https://example.com/out".to_string(),
            title: String::new(),
            text: "Open Google Scholar".to_string(),
        };
        let (augmenter, page, _, _) = augmenter(Arc::new(HappyFetcher), vec![by_title, by_text]);

        augmenter.scan();
        assert_eq!(page.actions(), vec![1, 2]);
    }

    #[test]
    fn test_scan_dedups_repeated_host_reports() {
        let (augmenter, page, _, _) = augmenter(
            Arc::new(HappyFetcher),
            vec![scholar_anchor(1), scholar_anchor(1)],
        );

        augmenter.scan();
        assert_eq!(page.attach_count(), 1);
    }

    #[tokio::test]
    async fn test_click_copies_and_notifies_success() {
        let (augmenter, page, clipboard, notifier) =
            augmenter(Arc::new(HappyFetcher), vec![scholar_anchor(1)]);

        augmenter.handle_click(&scholar_anchor(1)).await;

        assert_eq!(clipboard.writes(), vec!["@article{ok}".to_string()]);
        let notices = notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].1, NoticeKind::Success);
        // Busy toggled on, then back off
        assert_eq!(page.busy_transitions(1), vec![true, false]);
    }

    #[tokio::test]
    async fn test_click_failure_restores_action_and_reports_reason() {
        let (augmenter, page, clipboard, notifier) =
            augmenter(Arc::new(BareFetcher), vec![scholar_anchor(1)]);

        augmenter.handle_click(&scholar_anchor(1)).await;

        assert!(clipboard.writes().is_empty());
        let notices = notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].1, NoticeKind::Failure);
        assert!(notices[0].0.contains("Failed to get BibTeX"));
        assert_eq!(page.busy_transitions(1), vec![true, false]);
    }

    #[tokio::test]
    async fn test_click_on_anchor_without_destination_short_circuits() {
        let mut anchor = scholar_anchor(1);
        anchor.href = String::new();
        let (augmenter, page, clipboard, notifier) =
            augmenter(Arc::new(HappyFetcher), vec![anchor.clone()]);

        augmenter.handle_click(&anchor).await;

        assert!(clipboard.writes().is_empty());
        assert_eq!(notifier.notices()[0].1, NoticeKind::Failure);
        // The lookup never started, so the action was never disabled
        assert!(page.busy_transitions(1).is_empty());
    }

    #[tokio::test]
    async fn test_clipboard_rejection_surfaces_as_failure() {
        let (augmenter, _, clipboard, notifier) =
            augmenter(Arc::new(HappyFetcher), vec![scholar_anchor(1)]);
        clipboard.reject_writes();

        augmenter.handle_click(&scholar_anchor(1)).await;

        let notices = notifier.notices();
        assert_eq!(notices[0].1, NoticeKind::Failure);
        assert!(notices[0].0.contains("Failed to get BibTeX"));
    }

    #[test]
    fn test_scan_config_default_patterns() {
        let config = ScanConfig::default();
        assert!(config.matches(&scholar_anchor(1)));
    }
}
