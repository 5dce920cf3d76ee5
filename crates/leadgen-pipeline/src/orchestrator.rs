//! The enrichment orchestrator.
//!
//! Owns the lead collection for one session and is its only writer. State
//! lives in a `watch` channel: every transition is published as a fresh
//! [`SessionView`], and the optimistic `Enriching` mark is sent before the
//! remote call is awaited.
//!
//! A new search bumps the collection generation. Enrichment results carry the
//! generation they were dispatched under and are dropped if it no longer
//! matches, so a slow call can never write into a newer collection.

use std::sync::Arc;

use futures::future::join_all;
use leadgen_core::{Lead, LeadId, LeadStatus};
use leadgen_gemini::ENRICHMENT_FAILED_NOTE;
use tokio::sync::watch;

use crate::error::PipelineError;
use crate::service::LeadService;
use crate::session::{Banner, SearchParams, SessionView};

/// Leads enriched concurrently per bulk batch.
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// What happened to a single enrichment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichOutcome {
    Completed,
    Failed,
    /// No lead with that id in the current collection.
    NotFound,
    /// The lead's status does not allow this action.
    Ineligible(LeadStatus),
    /// Single-lead triggers are disabled while a bulk run is active.
    BulkInProgress,
    /// The collection was replaced while the call was in flight; the result
    /// was discarded.
    Stale,
}

/// Summary of one [`Orchestrator::enrich_all`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    /// Size of each batch, in the order they ran.
    pub batch_sizes: Vec<usize>,
    pub completed: usize,
    pub failed: usize,
    /// Selected leads that were not enriched (stale, or changed state
    /// before their batch started).
    pub skipped: usize,
}

impl BulkReport {
    #[must_use]
    pub fn batches(&self) -> usize {
        self.batch_sizes.len()
    }

    fn record(&mut self, outcome: EnrichOutcome) {
        match outcome {
            EnrichOutcome::Completed => self.completed += 1,
            EnrichOutcome::Failed => self.failed += 1,
            _ => self.skipped += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Single,
    Retry,
    Bulk,
}

impl Trigger {
    fn accepts(self, status: LeadStatus) -> bool {
        match self {
            Trigger::Single | Trigger::Bulk => status.is_pending(),
            Trigger::Retry => status == LeadStatus::Failed,
        }
    }
}

/// Clears the bulk flag when a run ends, including when its future is
/// dropped mid-run.
struct BulkGuard<'a> {
    state: &'a watch::Sender<SessionView>,
}

impl Drop for BulkGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.bulk_in_progress = false);
    }
}

pub struct Orchestrator {
    service: Arc<dyn LeadService>,
    batch_size: usize,
    state: watch::Sender<SessionView>,
}

impl Orchestrator {
    /// `batch_size` is clamped to at least 1.
    #[must_use]
    pub fn new(service: Arc<dyn LeadService>, batch_size: usize) -> Self {
        let (state, _) = watch::channel(SessionView::default());
        Self {
            service,
            batch_size: batch_size.max(1),
            state,
        }
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Receiver that sees every published state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionView {
        self.state.borrow().clone()
    }

    /// Replace the collection with a fresh discovery result.
    ///
    /// The old collection is cleared immediately. On success the discovered
    /// leads are installed (with a `NoResults` banner if there are none) and
    /// their count is returned. If another search started meanwhile, this
    /// result is discarded and `0` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Discovery`] if the remote call fails. The
    /// collection stays empty and the banner is set to `SearchFailed`.
    pub async fn search(&self, params: &SearchParams) -> Result<usize, PipelineError> {
        let mut generation = 0;
        self.state.send_modify(|s| {
            s.generation += 1;
            s.leads.clear();
            s.banner = None;
            s.searching = true;
            generation = s.generation;
        });

        tracing::info!(
            industry = params.industry(),
            location = params.location(),
            generation,
            "starting search"
        );

        match self
            .service
            .discover(params.industry(), params.location())
            .await
        {
            Ok(leads) => {
                let count = leads.len();
                if self.finish_search(generation, Some(leads)) {
                    Ok(count)
                } else {
                    tracing::debug!(generation, "discarding superseded search result");
                    Ok(0)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "discovery failed");
                self.finish_search(generation, None);
                Err(PipelineError::Discovery(e))
            }
        }
    }

    fn finish_search(&self, generation: u64, leads: Option<Vec<Lead>>) -> bool {
        self.state.send_if_modified(|s| {
            if s.generation != generation {
                return false;
            }
            s.searching = false;
            match leads {
                Some(leads) => {
                    s.banner = leads.is_empty().then_some(Banner::NoResults);
                    s.leads = leads;
                }
                None => {
                    s.banner = Some(Banner::SearchFailed);
                    s.leads.clear();
                }
            }
            true
        })
    }

    /// Enrich one `Discovered` or `Failed` lead.
    ///
    /// The lead is marked `Enriching` and published before the remote call
    /// is issued; the service's result then replaces it, whatever the
    /// outcome. Refused while a bulk run is active.
    pub async fn enrich_one(&self, id: LeadId) -> EnrichOutcome {
        self.run_enrichment(id, Trigger::Single).await
    }

    /// Explicit retry of a `Failed` lead.
    pub async fn retry(&self, id: LeadId) -> EnrichOutcome {
        self.run_enrichment(id, Trigger::Retry).await
    }

    /// Enrich every lead that is `Discovered` or `Failed` at call time.
    ///
    /// Selected leads are split into batches of [`Self::batch_size`]. Batches
    /// run strictly one after another; members of a batch run concurrently.
    /// The run stops early if a new search replaces the collection.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::BulkInProgress`] if another bulk run is
    /// active.
    pub async fn enrich_all(&self) -> Result<BulkReport, PipelineError> {
        let mut claimed: Option<(u64, Vec<LeadId>)> = None;
        self.state.send_if_modified(|s| {
            if s.bulk_in_progress {
                return false;
            }
            s.bulk_in_progress = true;
            let pending = s
                .leads
                .iter()
                .filter(|l| l.status.is_pending())
                .map(|l| l.id)
                .collect();
            claimed = Some((s.generation, pending));
            true
        });

        let Some((generation, pending)) = claimed else {
            return Err(PipelineError::BulkInProgress);
        };
        let _guard = BulkGuard { state: &self.state };

        let mut report = BulkReport::default();
        let total_batches = pending.len().div_ceil(self.batch_size);

        for (index, batch) in pending.chunks(self.batch_size).enumerate() {
            let current = self.state.borrow().generation;
            if current != generation {
                tracing::info!(
                    completed_batches = index,
                    total_batches,
                    "collection replaced; stopping bulk enrichment"
                );
                report.skipped += pending.len() - index * self.batch_size;
                break;
            }

            tracing::info!(
                batch = index + 1,
                total_batches,
                size = batch.len(),
                "starting enrichment batch"
            );
            let outcomes = join_all(
                batch
                    .iter()
                    .map(|id| self.run_enrichment(*id, Trigger::Bulk)),
            )
            .await;

            report.batch_sizes.push(batch.len());
            for outcome in outcomes {
                report.record(outcome);
            }
        }

        tracing::info!(
            completed = report.completed,
            failed = report.failed,
            skipped = report.skipped,
            "bulk enrichment finished"
        );
        Ok(report)
    }

    async fn run_enrichment(&self, id: LeadId, trigger: Trigger) -> EnrichOutcome {
        let (lead, generation) = match self.begin_enrichment(id, trigger) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };
        let result = self.service.enrich(lead).await;
        self.apply_enrichment(id, generation, result)
    }

    /// Mark the lead `Enriching` and hand back a copy to dispatch, tagged
    /// with the current generation.
    fn begin_enrichment(
        &self,
        id: LeadId,
        trigger: Trigger,
    ) -> Result<(Lead, u64), EnrichOutcome> {
        let mut started = Err(EnrichOutcome::NotFound);
        self.state.send_if_modified(|s| {
            if trigger != Trigger::Bulk && s.bulk_in_progress {
                started = Err(EnrichOutcome::BulkInProgress);
                return false;
            }
            let generation = s.generation;
            let Some(lead) = s.leads.iter_mut().find(|l| l.id == id) else {
                return false;
            };
            if !trigger.accepts(lead.status) || lead.transition(LeadStatus::Enriching).is_err() {
                started = Err(EnrichOutcome::Ineligible(lead.status));
                return false;
            }
            started = Ok((lead.clone(), generation));
            true
        });
        started
    }

    fn apply_enrichment(&self, id: LeadId, generation: u64, mut result: Lead) -> EnrichOutcome {
        if !result.status.is_terminal() {
            tracing::warn!(lead_id = %id, status = %result.status, "enrichment returned a non-terminal status");
            result.status = LeadStatus::Failed;
            result.notes = Some(ENRICHMENT_FAILED_NOTE.to_string());
        }
        let outcome = if result.status == LeadStatus::Completed {
            EnrichOutcome::Completed
        } else {
            EnrichOutcome::Failed
        };

        let applied = self.state.send_if_modified(|s| {
            if s.generation != generation {
                return false;
            }
            let Some(lead) = s.leads.iter_mut().find(|l| l.id == id) else {
                return false;
            };
            if !lead.status.can_transition_to(result.status) {
                return false;
            }
            lead.absorb_enrichment(result);
            true
        });

        if applied {
            outcome
        } else {
            tracing::debug!(lead_id = %id, generation, "discarding stale enrichment result");
            EnrichOutcome::Stale
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
