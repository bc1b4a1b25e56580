// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod config;
pub mod fill;
pub mod order;
pub mod plan;
pub mod venue;

pub use config::{ExecutionConfig, IndexBackend, MarketDataConfig};
pub use fill::Fill;
pub use order::{Order, OrderId, Side, VenueId};
pub use plan::{ExecutionPlan, PlanEntry, VenueDiagnostic};
pub use venue::Venue;
