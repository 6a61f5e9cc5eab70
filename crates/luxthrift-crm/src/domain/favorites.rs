//! A user's favorite category and brand.

use luxthrift_core::event::ActivityEvent;

/// The category and brand a user is assumed to prefer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    /// First category seen in the user's history.
    pub category: Option<String>,
    /// First brand seen in the user's history.
    pub brand: Option<String>,
}

impl Favorites {
    /// Derives favorites from `events` in chronological order.
    ///
    /// Each favorite is the *first* non-null value encountered, not the most
    /// frequent one.
    #[must_use]
    pub fn first_seen(events: &[ActivityEvent]) -> Self {
        Self {
            category: events.iter().find_map(|e| e.category.clone()),
            brand: events.iter().find_map(|e| e.brand.clone()),
        }
    }

    /// Returns `true` when neither favorite is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.brand.is_none()
    }
}
