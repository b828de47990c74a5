//! The core data type shared across all content providers.
//!
//! `ContentItem` represents a single photo or video in a feed.  Every
//! provider converts its native format into `ContentItem`s so the rest of
//! the application can stay provider-agnostic.
//!
//! ## For contributors
//!
//! Items are read-only once produced: the controller never edits metrics,
//! categories or flags.  If a provider needs an extra field, add it here
//! with `#[serde(default)]` so older payloads keep decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Stable identifier of an item within one feed session.
pub type ItemId = u64;

/// Category an item belongs to.  `CategoryId::ALL` doubles as the
/// "uncategorized" marker and the "show everything" filter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u8);

impl CategoryId {
    pub const ALL: CategoryId = CategoryId(0);

    pub fn is_all(self) -> bool {
        self == Self::ALL
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Presentation hint for the asset's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    Portrait,
    Landscape,
    Square,
}

impl Aspect {
    pub fn label(self) -> &'static str {
        match self {
            Aspect::Portrait => "3:4",
            Aspect::Landscape => "4:3",
            Aspect::Square => "1:1",
        }
    }
}

/// Display-only engagement counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub likes: u64,
    pub views: u64,
}

/// A single unit of shareable media, normalised from any provider.
///
/// ## Sorting
///
/// `ContentItem` implements [`Ord`] for **reverse-chronological** ordering:
/// newer items sort before older ones.  Providers use this to sort each
/// page; the controller itself never re-sorts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique within a feed session.
    pub id: ItemId,

    /// Human-readable caption.
    pub title: String,

    /// Name of the photographer.
    #[serde(default)]
    pub author: String,

    pub kind: MediaKind,

    /// Locator for the asset (image or video URL).
    pub media_url: String,

    pub aspect: Aspect,

    #[serde(default)]
    pub category: CategoryId,

    #[serde(default)]
    pub metrics: Metrics,

    pub created_at: DateTime<Utc>,

    /// Editor pick.
    #[serde(default)]
    pub featured: bool,
}

// ---------------------------------------------------------------------------
// Ordering (newest first)
// ---------------------------------------------------------------------------

impl Ord for ContentItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // `other` first so that a newer timestamp sorts earlier.
        other.created_at.cmp(&self.created_at)
    }
}

impl PartialOrd for ContentItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
