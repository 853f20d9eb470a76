use crate::core::batch_fetcher::BatchFetcher;
use crate::core::{Catalog, DetailSource, RosterSource, Sleeper};
use crate::utils::error::Result;
use crate::utils::validation::validate_range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

pub const MIN_GENERATION: u32 = 1;
pub const MAX_GENERATION: u32 = 9;
pub const DEFAULT_GENERATION: u32 = 2;

/// Identifies one catalog load; later loads get larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Keeps only the result of the most recently started load.
///
/// In-flight loads are not cancelled. A load that finishes after a newer
/// one has begun fails [`publish`](Self::publish) and its catalog is dropped.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest_ticket: AtomicU64,
    published: Mutex<Option<Catalog>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest_ticket.load(Ordering::SeqCst) == ticket.0
    }

    pub fn publish(&self, ticket: RequestTicket, catalog: Catalog) -> bool {
        let mut published = self
            .published
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // checked under the lock so two finishing loads cannot interleave
        if !self.is_current(ticket) {
            return false;
        }

        *published = Some(catalog);
        true
    }

    pub fn latest(&self) -> Option<Catalog> {
        self.published
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Roster lookup followed by a batched detail fetch.
pub struct CatalogService<R, D, Z> {
    roster: R,
    fetcher: BatchFetcher<D, Z>,
    tracker: RequestTracker,
}

impl<R, D, Z> CatalogService<R, D, Z>
where
    R: RosterSource,
    D: DetailSource,
    Z: Sleeper,
{
    pub fn new(roster: R, fetcher: BatchFetcher<D, Z>) -> Self {
        Self {
            roster,
            fetcher,
            tracker: RequestTracker::new(),
        }
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// Fails only when the generation is out of range or the roster
    /// lookup fails. Detail failures just shrink the catalog.
    pub async fn load(&self, generation: u32) -> Result<Catalog> {
        validate_range("generation", generation, MIN_GENERATION, MAX_GENERATION)?;

        let roster = self.roster.fetch_roster(generation).await?;
        let identifiers = roster.identifiers();
        tracing::info!(
            "Generation {} roster has {} species",
            generation,
            identifiers.len()
        );

        let report = self.fetcher.fetch_all_with_report(&identifiers).await;
        if !report.skipped.is_empty() {
            tracing::warn!(
                "{} of {} species could not be fetched and were left out",
                report.skipped.len(),
                identifiers.len()
            );
        }

        Ok(Catalog {
            generation,
            requested: identifiers.len(),
            records: report.records,
            fetched_at: chrono::Utc::now(),
        })
    }

    /// Loads `generation` and publishes it unless a newer refresh started
    /// in the meantime, in which case `Ok(None)` is returned.
    ///
    /// Meant for long-lived callers that may start a new load before the
    /// previous one finishes; one-shot runs can call [`load`](Self::load).
    pub async fn refresh(&self, generation: u32) -> Result<Option<Catalog>> {
        let ticket = self.tracker.begin();
        tracing::debug!("Refresh #{} for generation {}", ticket.id(), generation);

        let catalog = self.load(generation).await?;

        if self.tracker.publish(ticket, catalog.clone()) {
            Ok(Some(catalog))
        } else {
            tracing::debug!(
                "Discarding stale refresh #{} for generation {}",
                ticket.id(),
                generation
            );
            Ok(None)
        }
    }
}
