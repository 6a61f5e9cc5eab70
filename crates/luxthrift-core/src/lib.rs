//! LuxThrift Core: shared domain types.
//!
//! This crate defines the activity event model, the error taxonomy and the
//! repository seams that the tracking and CRM contexts depend on. It contains
//! no infrastructure code.

pub mod catalog;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod repository;
pub mod rng;
pub mod tally;
