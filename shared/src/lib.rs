//! Shared domain types for the Tally order server
//!
//! Value types used by the server and its clients: the order status
//! state machine, the stock ledger entry types, and the dispatch wire
//! DTOs. Everything here is plain data, no I/O, no store access.

pub mod dispatch;
pub mod status;
pub mod stock;

// Re-exports
pub use dispatch::{DispatchLine, DispatchRecord};
pub use status::{OrderStatus, TransitionError};
pub use stock::{StockChangeType, StockEntry};
