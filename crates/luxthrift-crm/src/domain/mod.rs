//! Domain layer for the CRM context.

pub mod favorites;
pub mod insights;
