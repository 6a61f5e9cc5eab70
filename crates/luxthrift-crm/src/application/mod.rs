//! Application layer for the CRM context.

pub mod query_handlers;
