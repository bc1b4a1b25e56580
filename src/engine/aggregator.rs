// ============================================================================
// Best Execution Engine
// Fans a request out to every venue and merges the proposals
// ============================================================================

use crate::domain::{ExecutionConfig, ExecutionPlan, Side, Venue, VenueDiagnostic};
use crate::engine::{CancellationToken, FillCollector, MatchOutcome, Matcher, ProposalKey};
use crate::error::{ExecutionError, ExecutionResult};
use crate::index::build_index;
use crate::interfaces::{EventHandler, ExecutionEvent};
use crate::numeric::{checked_sub, checked_sum, ensure_positive, Quantity};
use chrono::Utc;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Best-execution engine over a set of independent venues
///
/// Every venue is matched against the full target with the configured
/// price index. The proposals are deduplicated by order id, ranked
/// globally by price and capped at the requested quantity, so the plan
/// never exceeds the request and does not depend on worker timing.
///
/// # Example
/// ```
/// use meta_exchange::prelude::*;
/// use rust_decimal_macros::dec;
/// use std::sync::Arc;
///
/// let mut venue = Venue::new("alpha");
/// venue.add_order(Order::new(venue.id, Side::Sell, dec!(15), dec!(105)));
/// venue.add_order(Order::new(venue.id, Side::Sell, dec!(20), dec!(110)));
///
/// let engine = BestExecutionEngine::new(ExecutionConfig::default(), Arc::new(NoOpEventHandler));
/// let plan = engine.best_execution(&[venue], Side::Buy, dec!(30)).unwrap();
///
/// assert_eq!(plan.filled_quantity(), dec!(30));
/// assert_eq!(plan.fills[0].price, dec!(105));
/// ```
pub struct BestExecutionEngine {
    config: ExecutionConfig,

    /// Event handler for processing events
    event_handler: Arc<dyn EventHandler>,
}

impl BestExecutionEngine {
    pub fn new(config: ExecutionConfig, event_handler: Arc<dyn EventHandler>) -> Self {
        Self {
            config,
            event_handler,
        }
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Compute the best-execution plan for `target` of `side` across `venues`.
    ///
    /// # Errors
    /// `InvalidArgument` for a non-positive target or too many venues.
    /// Venue-level failures do not fail the request; they are reported in
    /// [`ExecutionPlan::diagnostics`].
    pub fn best_execution(
        &self,
        venues: &[Venue],
        side: Side,
        target: Quantity,
    ) -> ExecutionResult<ExecutionPlan> {
        self.best_execution_with_cancellation(venues, side, target, &CancellationToken::new())
    }

    /// Same as [`best_execution`](Self::best_execution), polling `token`
    /// before every extraction. A cancelled request returns `Cancelled` and
    /// discards all partial results.
    pub fn best_execution_with_cancellation(
        &self,
        venues: &[Venue],
        side: Side,
        target: Quantity,
        token: &CancellationToken,
    ) -> ExecutionResult<ExecutionPlan> {
        ensure_positive(target)?;
        if let Some(max_venues) = self.config.max_venues {
            if venues.len() > max_venues {
                return Err(ExecutionError::invalid_argument(format!(
                    "{} venues requested, at most {} allowed",
                    venues.len(),
                    max_venues
                )));
            }
        }

        self.event_handler.on_event(ExecutionEvent::ExecutionRequested {
            side,
            quantity: target,
            venues: venues.len(),
            timestamp: Utc::now(),
        });
        tracing::debug!(
            %side,
            %target,
            venues = venues.len(),
            backend = %self.config.index_backend,
            parallel = self.config.parallel,
            "best execution requested"
        );

        let collector = FillCollector::new();
        let job = |position: usize, venue: &Venue| {
            self.run_venue(position, venue, side, target, token, &collector)
        };

        let results = if self.config.parallel {
            fan_out_parallel(venues, &job)
        } else {
            fan_out_sequential(venues, &job)
        };

        if token.is_cancelled() || results.iter().any(|r| matches!(r, Err(ExecutionError::Cancelled))) {
            return Err(self.abort(ExecutionError::Cancelled));
        }

        let mut events = Vec::with_capacity(venues.len() + 1);
        for (venue, result) in venues.iter().zip(&results) {
            events.push(match result {
                Ok(outcome) => ExecutionEvent::VenueMatched {
                    venue_id: venue.id,
                    fills: outcome.fills.len(),
                    remaining: outcome.remaining,
                    timestamp: Utc::now(),
                },
                Err(error) => ExecutionEvent::VenueFailed {
                    venue_id: venue.id,
                    error: error.clone(),
                    timestamp: Utc::now(),
                },
            });
        }

        let diagnostics = collect_diagnostics(venues, &results);

        let fills = collector.into_ranked_fills(side, target)?;
        let filled = checked_sum(fills.iter().map(|fill| fill.quantity))?;
        let unfilled = checked_sub(target, filled)?;
        let plan = ExecutionPlan::new(side, target, fills, diagnostics);

        events.push(ExecutionEvent::PlanCompleted {
            side,
            fills: plan.fills.len(),
            filled,
            unfilled,
            timestamp: Utc::now(),
        });
        self.event_handler.on_events(events);

        tracing::info!(
            %side,
            requested = %target,
            %filled,
            fills = plan.fills.len(),
            failed_venues = plan.diagnostics.len(),
            "best execution plan computed"
        );

        Ok(plan)
    }

    fn run_venue(
        &self,
        position: usize,
        venue: &Venue,
        side: Side,
        target: Quantity,
        token: &CancellationToken,
        collector: &FillCollector,
    ) -> ExecutionResult<MatchOutcome> {
        let outcome = self.match_venue(venue, side, target, token)?;

        for (sequence, fill) in outcome.fills.iter().enumerate() {
            collector.record(ProposalKey::new(fill.order_id, position, sequence), fill.clone());
        }
        tracing::debug!(
            venue = %venue.name,
            fills = outcome.fills.len(),
            remaining = %outcome.remaining,
            "venue matched"
        );

        Ok(outcome)
    }

    fn match_venue(
        &self,
        venue: &Venue,
        side: Side,
        target: Quantity,
        token: &CancellationToken,
    ) -> ExecutionResult<MatchOutcome> {
        let mut index = build_index(self.config.index_backend, side, venue.orders())?;
        Matcher::new(side)
            .with_cancellation(token.clone())
            .fill(index.as_mut(), target)
    }

    fn abort(&self, error: ExecutionError) -> ExecutionError {
        tracing::warn!(%error, "best execution aborted");
        self.event_handler.on_event(ExecutionEvent::ExecutionAborted {
            error: error.clone(),
            timestamp: Utc::now(),
        });
        error
    }
}

// ============================================================================
// Venue Fan-out
// ============================================================================

/// One scoped worker thread per venue, joined in venue order
fn fan_out_parallel<F>(venues: &[Venue], job: &F) -> Vec<ExecutionResult<MatchOutcome>>
where
    F: Fn(usize, &Venue) -> ExecutionResult<MatchOutcome> + Sync,
{
    crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = venues
            .iter()
            .enumerate()
            .map(|(position, venue)| scope.spawn(move |_| job(position, venue)))
            .collect();

        handles
            .into_iter()
            .zip(venues)
            .map(|(handle, venue)| {
                handle
                    .join()
                    .map_err(|_| ExecutionError::WorkerPanicked { venue_id: venue.id })
                    .and_then(|result| result)
            })
            .collect()
    })
    // Every handle is joined above, so the scope itself cannot fail
    .unwrap_or_else(|_| {
        venues
            .iter()
            .map(|venue| Err(ExecutionError::WorkerPanicked { venue_id: venue.id }))
            .collect()
    })
}

fn fan_out_sequential<F>(venues: &[Venue], job: &F) -> Vec<ExecutionResult<MatchOutcome>>
where
    F: Fn(usize, &Venue) -> ExecutionResult<MatchOutcome>,
{
    venues
        .iter()
        .enumerate()
        .map(|(position, venue)| {
            panic::catch_unwind(AssertUnwindSafe(|| job(position, venue)))
                .map_err(|_| ExecutionError::WorkerPanicked { venue_id: venue.id })
                .and_then(|result| result)
        })
        .collect()
}

/// Every failed venue except a cancelled one, in venue order
fn collect_diagnostics(
    venues: &[Venue],
    results: &[ExecutionResult<MatchOutcome>],
) -> Vec<VenueDiagnostic> {
    venues
        .iter()
        .zip(results)
        .filter_map(|(venue, result)| match result {
            Err(ExecutionError::Cancelled) | Ok(_) => None,
            Err(error) => {
                tracing::warn!(venue = %venue.name, %error, "venue excluded from plan");
                Some(VenueDiagnostic {
                    venue_id: venue.id,
                    venue_name: venue.name.clone(),
                    error: error.clone(),
                })
            },
        })
        .collect()
}

// ============================================================================
// Async Execution
// ============================================================================

#[cfg(feature = "async")]
impl BestExecutionEngine {
    /// Run the aggregation on a blocking task, giving up after `timeout`.
    ///
    /// On timeout the workers are cancelled and their partial results
    /// discarded.
    ///
    /// # Errors
    /// `TimedOut` when the deadline passes, otherwise as
    /// [`best_execution`](Self::best_execution).
    pub async fn best_execution_with_timeout(
        self: Arc<Self>,
        venues: Vec<Venue>,
        side: Side,
        target: Quantity,
        timeout: std::time::Duration,
    ) -> ExecutionResult<ExecutionPlan> {
        let token = CancellationToken::new();
        let worker_token = token.clone();
        let engine = Arc::clone(&self);

        let task = tokio::task::spawn_blocking(move || {
            engine.best_execution_with_cancellation(&venues, side, target, &worker_token)
        });

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                if join_error.is_panic() {
                    panic::resume_unwind(join_error.into_panic());
                }
                Err(self.abort(ExecutionError::Cancelled))
            },
            Err(_) => {
                token.cancel();
                Err(self.abort(ExecutionError::TimedOut(timeout)))
            },
        }
    }

    /// Async execution under the configured deadline, if any
    pub async fn best_execution_async(
        self: Arc<Self>,
        venues: Vec<Venue>,
        side: Side,
        target: Quantity,
    ) -> ExecutionResult<ExecutionPlan> {
        match self.config.timeout {
            Some(timeout) => {
                self.best_execution_with_timeout(venues, side, target, timeout)
                    .await
            },
            None => {
                let engine = Arc::clone(&self);
                tokio::task::spawn_blocking(move || engine.best_execution(&venues, side, target))
                    .await
                    .unwrap_or_else(|join_error| {
                        if join_error.is_panic() {
                            panic::resume_unwind(join_error.into_panic());
                        }
                        Err(self.abort(ExecutionError::Cancelled))
                    })
            },
        }
    }
}
