//! Analysis pass: rates from the span cache, labels from the name cache.

use crate::cache::{NameCache, SpanCache};
use crate::progress::progress_bar;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use twap_api::SocialApi;
use twap_common::{AccountId, Result};

/// Whether names are still being looked up.
///
/// Starts as `Resolving`; the first rate-limit response switches it to
/// `RateLimited` for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionState {
    #[default]
    Resolving,
    RateLimited,
}

/// An account with its display label and rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedAccount {
    pub id: AccountId,
    pub label: String,
    pub rate: f64,
}

/// Turns account ids into labels, through the name cache first.
pub struct NameResolver<'a, A: ?Sized> {
    api: &'a A,
    cache: NameCache,
    cache_path: PathBuf,
    state: ResolutionState,
    lookups: usize,
}

impl<'a, A: SocialApi + ?Sized> NameResolver<'a, A> {
    pub fn new(api: &'a A, cache: NameCache, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            api,
            cache,
            cache_path: cache_path.into(),
            state: ResolutionState::default(),
            lookups: 0,
        }
    }

    pub fn state(&self) -> ResolutionState {
        self.state
    }

    pub fn cache(&self) -> &NameCache {
        &self.cache
    }

    /// API lookups issued so far.
    pub fn lookups(&self) -> usize {
        self.lookups
    }

    /// Label for `id`: the cached name, a freshly resolved name (persisted
    /// immediately), or the raw id once rate limited or for unknown accounts.
    pub async fn label(&mut self, id: AccountId) -> Result<String> {
        if let Some(name) = self.cache.get(id) {
            return Ok(name.to_string());
        }
        if self.state == ResolutionState::RateLimited {
            return Ok(id.to_string());
        }

        self.lookups += 1;
        match self.api.screen_name(id).await {
            Ok(name) => {
                self.cache.insert(id, name.clone());
                self.cache.save(&self.cache_path)?;
                Ok(name)
            }
            Err(e) if e.is_rate_limited() => {
                warn!("Rate limited while resolving names, labelling the rest by id: {}", e);
                self.state = ResolutionState::RateLimited;
                Ok(id.to_string())
            }
            Err(e) if e.is_not_found() => {
                debug!(account = %id, "Account not found, labelling by id");
                Ok(id.to_string())
            }
            Err(e) => Err(e),
        }
    }
}

/// Resolved accounts with their rates, in id order. Unresolved accounts are skipped.
pub fn account_rates(cache: &SpanCache, tweet_count: u32) -> Vec<(AccountId, f64)> {
    cache
        .iter()
        .filter_map(|(id, span)| span.rate(tweet_count).map(|rate| (id, rate)))
        .collect()
}

/// Ascending by rate, ties by label.
pub fn sort_by_rate(accounts: &mut [RankedAccount]) {
    accounts.sort_by(|a, b| {
        a.rate
            .partial_cmp(&b.rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.label.cmp(&b.label))
    });
}

/// Settings of an analysis pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeOptions {
    /// Posts fetched per account during collection; the rate numerator.
    pub tweet_count: u32,
    pub progress_bar: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            tweet_count: 50,
            progress_bar: false,
        }
    }
}

/// Result of an analysis pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Every resolved account, ascending by rate.
    pub ranked: Vec<RankedAccount>,
    /// Accounts left out because they were never collected.
    pub skipped_unresolved: usize,
    pub resolution: ResolutionState,
}

impl Analysis {
    /// Sum of all rates.
    pub fn total_rate(&self) -> f64 {
        self.ranked.iter().map(|a| a.rate).sum()
    }
}

pub struct Analyzer<'a, A: ?Sized> {
    api: &'a A,
    options: AnalyzeOptions,
}

impl<'a, A: SocialApi + ?Sized> Analyzer<'a, A> {
    pub fn new(api: &'a A, options: AnalyzeOptions) -> Self {
        Self { api, options }
    }

    /// Rank every resolved account in the span cache, resolving labels on the way.
    #[instrument(skip(self), fields(spans = %span_cache_path.display()))]
    pub async fn run(&self, span_cache_path: &Path, name_cache_path: &Path) -> Result<Analysis> {
        let spans = SpanCache::load(span_cache_path)?;
        let names = NameCache::load_or_default(name_cache_path)?;

        let rates = account_rates(&spans, self.options.tweet_count);
        let skipped_unresolved = spans.len() - rates.len();
        if skipped_unresolved > 0 {
            info!("Skipping {} accounts that have not been collected yet", skipped_unresolved);
        }

        let mut resolver = NameResolver::new(self.api, names, name_cache_path);
        let bar = progress_bar(rates.len(), self.options.progress_bar, "resolving");

        let mut ranked = Vec::with_capacity(rates.len());
        for (id, rate) in rates {
            let label = resolver.label(id).await?;
            ranked.push(RankedAccount { id, label, rate });
            bar.inc(1);
        }
        bar.finish_and_clear();

        sort_by_rate(&mut ranked);
        info!(
            accounts = ranked.len(),
            lookups = resolver.lookups(),
            "Ranked accounts"
        );

        Ok(Analysis {
            ranked,
            skipped_unresolved,
            resolution: resolver.state(),
        })
    }
}
