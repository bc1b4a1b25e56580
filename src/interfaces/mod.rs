// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod event_handler;
mod market_data;
mod price_index;

pub use event_handler::{EventHandler, ExecutionEvent, LoggingEventHandler, NoOpEventHandler};
pub use market_data::MarketDataSource;
pub use price_index::{extract_in_order, ExtractInOrder, PriceIndex, PriceOrder, PriorityKey};
