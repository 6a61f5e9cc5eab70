//! Route modules.

pub mod activity;
pub mod crm;
pub mod health;
