//! LuxThrift: CRM bounded context.
//!
//! Derives dashboard insights (top products, trending categories, recent
//! activity, per-user category preferences) from the durable activity store
//! and resolves naive per-user product recommendations.

pub mod application;
pub mod domain;
