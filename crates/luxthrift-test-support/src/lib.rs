//! Shared test fakes and utilities for LuxThrift.

mod catalog;
mod clock;
mod fixtures;
mod repository;
mod rng;

pub use catalog::{FailingCatalog, InMemoryCatalog, InMemoryUserDirectory};
pub use clock::{FixedClock, SteppingClock, fixed_now};
pub use fixtures::{catalog_item, new_activity};
pub use repository::{FailingActivityRepository, InMemoryActivityRepository};
pub use rng::{MockRng, SequenceRng};
