//! Collection pass: fill in the span of every unresolved account.
//!
//! The pass stops at the first failed fetch. Whatever was resolved before the
//! failure is persisted, so the next run resumes with exactly the accounts
//! that are still unresolved.

use crate::cache::SpanCache;
use crate::progress::progress_bar;
use crate::span::Span;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, error, info, instrument};
use twap_api::SocialApi;
use twap_common::{AccountId, Result};

/// Settings of a collection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
    /// Posts fetched per account.
    pub tweet_count: u32,
    pub progress_bar: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            tweet_count: 50,
            progress_bar: false,
        }
    }
}

/// Outcome of a collection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectReport {
    /// Fetches issued, including the one that failed.
    pub attempted: usize,
    /// Accounts whose span was filled in.
    pub resolved: usize,
    /// Accounts still unresolved after the pass.
    pub remaining: usize,
    /// Error that stopped the pass early.
    pub aborted: Option<String>,
}

impl CollectReport {
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }
}

/// Runs collection passes against a span cache file.
pub struct Collector<'a, A: ?Sized> {
    api: &'a A,
    options: CollectOptions,
    clock: Box<dyn Fn() -> DateTime<Utc> + Send + Sync + 'a>,
}

impl<'a, A: SocialApi + ?Sized> Collector<'a, A> {
    pub fn new(api: &'a A, options: CollectOptions) -> Self {
        Self {
            api,
            options,
            clock: Box::new(twap_common::now),
        }
    }

    /// Replace the wall clock used as "now" for each span.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'a) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Load the cache at `cache_path`, initialize it if empty, resolve every
    /// pending account and persist the result. The file must exist; a first
    /// run starts from `{}`.
    #[instrument(skip(self), fields(cache = %cache_path.display()))]
    pub async fn run(&self, cache_path: &Path) -> Result<CollectReport> {
        let mut cache = SpanCache::load(cache_path)?;

        if cache.is_empty() {
            cache = self.initialize().await?;
            cache.save(cache_path)?;
            info!("Initialized span cache with {} followed accounts", cache.len());
        }

        let report = self.resolve_pending(&mut cache).await;
        cache.save(cache_path)?;

        info!(
            attempted = report.attempted,
            resolved = report.resolved,
            remaining = report.remaining,
            "Collection pass finished"
        );
        Ok(report)
    }

    /// Fresh cache holding every account the authenticated user follows.
    pub async fn initialize(&self) -> Result<SpanCache> {
        let me = self.api.verify_credentials().await?;
        let friends = self.api.friend_ids(me.id).await?;
        Ok(SpanCache::from_follow_list(friends))
    }

    /// Fetch each unresolved account once, stopping at the first failure.
    /// Does not persist.
    pub async fn resolve_pending(&self, cache: &mut SpanCache) -> CollectReport {
        let pending = cache.unresolved_ids();
        let bar = progress_bar(pending.len(), self.options.progress_bar, "collecting");

        let mut attempted = 0;
        let mut resolved = 0;
        let mut aborted = None;

        for id in pending {
            attempted += 1;
            match self.fetch_span(id).await {
                Ok(span) => {
                    debug!(account = %id, ?span, "Resolved span");
                    cache.insert(id, span);
                    resolved += 1;
                    bar.inc(1);
                }
                Err(e) => {
                    error!(account = %id, "Fetching timeline failed, stopping pass: {}", e);
                    aborted = Some(e.to_string());
                    break;
                }
            }
        }

        if aborted.is_none() {
            bar.finish_with_message("done");
            info!("All accounts collected");
        } else {
            bar.abandon();
        }

        CollectReport {
            attempted,
            resolved,
            remaining: cache.unresolved_count(),
            aborted,
        }
    }

    async fn fetch_span(&self, id: AccountId) -> Result<Span> {
        let tweets = self.api.recent_tweets(id, self.options.tweet_count).await?;
        let now = (self.clock)();
        Ok(Span::from_timestamps(now, tweets.iter().map(|tweet| tweet.created_at)))
    }
}
