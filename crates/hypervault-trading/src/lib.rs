//! Trading gateway for the hypervault.
//!
//! Validates and submits limit orders and spot sends through a `CoreSink`.
//! Closing positions is not a separate primitive: it is a batch of
//! reduce-only IOC orders priced to cross the book.

pub mod close;
pub mod error;
pub mod gateway;
pub mod positions;

pub use close::{close_order_for, CloseFailure, ClosePolicy, CloseReport, ClosedOrder};
pub use error::{TradingError, TradingResult};
pub use gateway::{order_from_human, SubmittedOrder, TradingGateway};
pub use positions::{resolve_positions, OpenPosition};
