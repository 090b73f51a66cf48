//! Business logic services.

pub mod aggregation;
pub mod auth;
pub mod donation;
pub mod impact;
pub mod lifecycle;
pub mod reports;
