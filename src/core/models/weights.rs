//! Category weight table

use serde::{Deserialize, Serialize};

/// Weight percentage per assignment group, in the order the page lists them
///
/// Weights are percentages (`50.0` means 50%). They are expected to add up
/// to 100 but nothing here enforces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    entries: Vec<(String, f64)>,
}

impl CategoryWeights {
    /// Create an empty weight table
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace a category's weight, keeping its first position
    pub fn insert(&mut self, category: String, weight: f64) {
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == category) {
            entry.1 = weight;
        } else {
            self.entries.push((category, weight));
        }
    }

    /// Weight of a category, if the page listed it
    #[must_use]
    pub fn get(&self, category: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, weight)| *weight)
    }

    /// Whether the category has a weight
    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.get(category).is_some()
    }

    /// Number of weighted categories
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no category has a weight
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(category, weight)` pairs in page order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, weight)| (name.as_str(), *weight))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for CategoryWeights {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut weights = Self::new();
        for (category, weight) in iter {
            weights.insert(category.into(), weight);
        }
        weights
    }
}
