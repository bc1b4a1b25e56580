// ============================================================================
// Market Data Module
// Order suppliers for the meta-exchange service
// ============================================================================

mod fixture;
mod random;

pub use fixture::FixtureOrderSource;
pub use random::{RandomOrderConfig, RandomOrderSource};
