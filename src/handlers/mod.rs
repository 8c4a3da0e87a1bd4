//! Command Handlers module
//!
//! Handlers orchestrate library operations over the data store, the clock
//! and, for settlement, the payment gateway.

mod borrow_handler;
mod catalog_handler;
mod commands;
mod late_fee;
mod return_handler;
mod settlement_handler;
mod status_handler;


pub use borrow_handler::BorrowHandler;
pub use catalog_handler::CatalogHandler;
pub use commands::*;
pub use late_fee::LateFeeCalculator;
pub use return_handler::ReturnHandler;
pub use settlement_handler::SettlementHandler;
pub use status_handler::StatusHandler;
