//! Database models and DTOs for all domain entities.

pub mod donation;
pub mod notification;
pub mod profile;
