// ============================================================================
// Meta-Exchange Library
// Best execution of one order across several independent order books
// ============================================================================

//! # Meta-Exchange
//!
//! Splits a buy or sell request across several venues so that the best
//! prices available anywhere are taken first.
//!
//! ## Features
//!
//! - **Pluggable price indexes** (binary heap, AVL tree, price buckets, sorted vector)
//! - **Greedy matching** with exact decimal arithmetic and partial fills
//! - **Concurrent fan-out** with one scoped worker per venue
//! - **Per-venue fault isolation**: a failing venue becomes a diagnostic
//! - **Cooperative cancellation** and async deadlines (feature `async`)
//!
//! ## Example
//!
//! ```rust
//! use meta_exchange::prelude::*;
//! use rust_decimal_macros::dec;
//! use std::sync::Arc;
//!
//! let mut venue = Venue::new("exchange-1");
//! venue.add_order(Order::new(venue.id, Side::Sell, dec!(15), dec!(105)));
//! venue.add_order(Order::new(venue.id, Side::Sell, dec!(20), dec!(110)));
//! venue.add_order(Order::new(venue.id, Side::Buy, dec!(20), dec!(116)));
//!
//! let engine = ExecutionEngineBuilder::new()
//!     .avl_tree()
//!     .build(Arc::new(NoOpEventHandler))
//!     .unwrap();
//!
//! // Buying takes the cheapest asks first
//! let plan = engine.best_execution(&[venue], Side::Buy, dec!(30)).unwrap();
//! assert_eq!(plan.fills.len(), 2);
//! assert_eq!(plan.fills[0].price, dec!(105));
//! assert_eq!(plan.fills[1].quantity, dec!(15));
//! println!("{}", plan);
//! ```

pub mod domain;
pub mod engine;
pub mod error;
pub mod index;
pub mod interfaces;
#[cfg(feature = "logging")]
pub mod logging;
pub mod market_data;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        ExecutionConfig, ExecutionPlan, Fill, IndexBackend, MarketDataConfig, Order, OrderId,
        PlanEntry, Side, Venue, VenueDiagnostic, VenueId,
    };
    pub use crate::engine::{
        create_from_config, BestExecutionEngine, CancellationToken, ExecutionEngineBuilder,
        MatchOutcome, Matcher, MetaExchange,
    };
    pub use crate::error::{ExecutionError, ExecutionResult};
    pub use crate::interfaces::{
        EventHandler, ExecutionEvent, LoggingEventHandler, MarketDataSource, NoOpEventHandler,
        PriceIndex, PriceOrder,
    };
}
