//! Generated itinerary text

use std::fmt;

use serde::{Deserialize, Serialize};

/// Markdown itinerary exactly as the planner model returned it
///
/// No parsing or schema checks happen on this text; the rest of the
/// system only displays and saves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Itinerary(String);

impl Itinerary {
    pub fn new(markdown: impl Into<String>) -> Self {
        Self(markdown.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Itinerary {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
