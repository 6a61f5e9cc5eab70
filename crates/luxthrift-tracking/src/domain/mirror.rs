//! Bounded local mirror of recently captured activity.
//!
//! The mirror is a best-effort cache for same-session views such as a debug
//! activity feed. It is written independently of the durable store and is
//! never reconciled with it.

use std::collections::{HashSet, VecDeque};

use luxthrift_core::event::ActivityAction;
use luxthrift_core::tally::rank_by_count;
use serde::Serialize;

use super::submission::ActivitySubmission;

/// Retention cap of the local mirror.
pub const DEFAULT_MIRROR_CAPACITY: usize = 100;

/// Entry count at which the engagement score saturates.
const ENGAGEMENT_SATURATION: usize = 50;

/// FIFO cache holding at most `capacity` submissions.
#[derive(Debug, Clone)]
pub struct ActivityMirror {
    capacity: usize,
    entries: VecDeque<ActivitySubmission>,
}

impl ActivityMirror {
    /// Creates an empty mirror. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Stores `entry`, evicting and returning the oldest entry when full.
    pub fn put(&mut self, entry: ActivitySubmission) -> Option<ActivitySubmission> {
        let evicted = if self.entries.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Removes and returns the oldest entry.
    pub fn evict_oldest(&mut self) -> Option<ActivitySubmission> {
        self.entries.pop_front()
    }

    /// Returns up to `limit` entries, newest first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<ActivitySubmission> {
        self.entries.iter().rev().take(limit).cloned().collect()
    }

    /// Number of entries held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been captured yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retention cap.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Summarises the mirror contents for the same-session dashboard.
    #[must_use]
    pub fn summary(&self) -> MirrorSummary {
        let unique_visitors = self
            .entries
            .iter()
            .map(|e| e.actor.as_str())
            .collect::<HashSet<_>>()
            .len();
        let add_to_cart_count = self
            .entries
            .iter()
            .filter(|e| e.action == ActivityAction::AddToCart)
            .count();

        let conversion_rate = if unique_visitors == 0 {
            0.0
        } else {
            round_one_decimal(ratio(add_to_cart_count, unique_visitors) * 100.0)
        };
        let engagement_score = (self.entries.len() * 100 / ENGAGEMENT_SATURATION).min(100);

        let category_visits =
            rank_by_count(self.entries.iter().filter_map(|e| e.category.clone()))
                .into_iter()
                .map(|(category, visits)| CategoryVisits { category, visits })
                .collect();

        MirrorSummary {
            unique_visitors,
            add_to_cart_count,
            conversion_rate,
            engagement_score,
            category_visits,
        }
    }
}

impl Default for ActivityMirror {
    fn default() -> Self {
        Self::new(DEFAULT_MIRROR_CAPACITY)
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    numerator as f64 / denominator as f64
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Visit count for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryVisits {
    /// Category name.
    pub category: String,
    /// Number of mirrored events carrying it.
    pub visits: u64,
}

/// Session-level statistics derived from the mirror.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorSummary {
    /// Distinct actors seen.
    pub unique_visitors: usize,
    /// Number of add-to-cart actions.
    pub add_to_cart_count: usize,
    /// Add-to-cart actions per visitor, as a percentage with one decimal.
    pub conversion_rate: f64,
    /// Activity volume on a 0-100 scale.
    pub engagement_score: usize,
    /// Category visit counts, busiest first.
    pub category_visits: Vec<CategoryVisits>,
}
