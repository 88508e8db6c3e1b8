//! Resolve a citation for a free-text query and place it on the clipboard.
//!
//! ```bash
//! cargo run --example copy_citation -- "attention is all you need"
//! ```

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use citeclip::clipboard::{ClipboardWriter, SystemClipboard};
use citeclip::resolver::HttpFetcher;
use citeclip::{CitationResolver, LookupRequest};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let query: String = std::env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    let Some(request) = LookupRequest::free_text(&query) else {
        bail!("usage: copy_citation <query> (at least 5 characters)");
    };

    let fetcher = Arc::new(HttpFetcher::new().context("building HTTP client")?);
    let resolver = CitationResolver::new(fetcher);

    let citation = resolver.resolve(&request).await?;
    SystemClipboard::new().write_text(&citation)?;

    println!("{citation}");
    eprintln!("(copied to clipboard)");
    Ok(())
}
