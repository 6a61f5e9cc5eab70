//! Application layer for the Activity Tracking context.

pub mod capture;
pub mod command_handlers;
