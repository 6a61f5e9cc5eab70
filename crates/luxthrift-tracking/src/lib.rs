//! LuxThrift: Activity Tracking bounded context.
//!
//! Responsible for capturing user actions on the storefront, keeping a
//! bounded same-session mirror of them, and ingesting them into the durable
//! activity store.

pub mod application;
pub mod domain;
pub mod infrastructure;
