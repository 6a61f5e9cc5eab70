//! Domain layer for the Activity Tracking context.

pub mod commands;
pub mod guest;
pub mod mirror;
pub mod submission;
