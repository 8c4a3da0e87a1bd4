//! Library Service
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod domain;
pub mod gateway;
pub mod handlers;
pub mod store;

pub mod config;
pub mod db;
pub mod error;

pub use api::AppState;
pub use config::Config;
pub use domain::{Clock, DomainError, FeeQuote, OperationContext};
pub use error::AppError;
pub use gateway::{GatewayError, PaymentGateway};
pub use store::{LibraryStore, StoreError};
