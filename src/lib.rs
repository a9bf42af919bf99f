//! Virtual storage array API
//!
//! REST surface for virtual storage arrays and the volumes and drives linked
//! to them. Re-exports modules for the server binary and integration tests.

pub mod api;
pub mod audit;
pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod handlers;
pub mod projection;
pub mod store;

pub use config::Config;
pub use domain::{ChildKind, Direction, DomainError, OperationContext};
pub use error::{AppError, AppResult};
