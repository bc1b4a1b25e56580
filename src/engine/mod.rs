// ============================================================================
// Engine Module
// Contains the core best-execution business logic
// ============================================================================

mod aggregator;
mod cancellation;
mod collector;
mod matcher;
mod meta_exchange;

pub mod factory;

pub use aggregator::BestExecutionEngine;
pub use cancellation::CancellationToken;
pub use collector::{FillCollector, ProposalKey};
pub use factory::{create_from_config, ExecutionEngineBuilder};
pub use matcher::{MatchOutcome, Matcher};
pub use meta_exchange::MetaExchange;
