//! Aggregation of classified records
//!
//! Groups records by relationship and counts them overall and per frequency
//! band. All maps are ordered so that the same input always produces the same
//! output.

use std::collections::BTreeMap;

use crate::classifier::{ClassifiedRecord, FrequencyBand, RelationshipCategory};

/// Counts for one distinct relationship value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipSummary {
    pub relationship: String,
    pub category: RelationshipCategory,
    pub total: usize,
    /// Only bands with a non-zero count appear here
    pub bands: BTreeMap<FrequencyBand, usize>,
}

impl RelationshipSummary {
    fn new(relationship: String, category: RelationshipCategory) -> Self {
        Self {
            relationship,
            category,
            total: 0,
            bands: BTreeMap::new(),
        }
    }

    pub fn band_count(&self, band: FrequencyBand) -> usize {
        self.bands.get(&band).copied().unwrap_or(0)
    }

    /// `"Daily: 3, Monthly: 1"`, bands in fixed order, zero counts omitted
    pub fn summary_text(&self) -> String {
        self.bands
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(band, count)| format!("{}: {}", band, count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Result of the aggregation stage
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Descending by total, then ascending by name
    summaries: Vec<RelationshipSummary>,
    total_records: usize,
}

impl Aggregation {
    pub fn summaries(&self) -> &[RelationshipSummary] {
        &self.summaries
    }

    pub fn get(&self, relationship: &str) -> Option<&RelationshipSummary> {
        self.summaries
            .iter()
            .find(|s| s.relationship == relationship)
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Records per relationship
    pub fn relationship_counts(&self) -> BTreeMap<String, usize> {
        self.summaries
            .iter()
            .map(|s| (s.relationship.clone(), s.total))
            .collect()
    }

    /// Records per (relationship, band), non-zero pairs only
    pub fn band_counts(&self) -> BTreeMap<(String, FrequencyBand), usize> {
        self.summaries
            .iter()
            .flat_map(|s| {
                s.bands
                    .iter()
                    .map(move |(band, count)| ((s.relationship.clone(), *band), *count))
            })
            .collect()
    }

    /// Display string per relationship
    pub fn summary_strings(&self) -> BTreeMap<String, String> {
        self.summaries
            .iter()
            .map(|s| (s.relationship.clone(), s.summary_text()))
            .collect()
    }

    pub fn categories(&self) -> BTreeMap<String, RelationshipCategory> {
        self.summaries
            .iter()
            .map(|s| (s.relationship.clone(), s.category))
            .collect()
    }

    /// Total records whose relationship falls in the given category
    pub fn category_total(&self, category: RelationshipCategory) -> usize {
        self.summaries
            .iter()
            .filter(|s| s.category == category)
            .map(|s| s.total)
            .sum()
    }
}

/// Group classified records by relationship
pub fn aggregate(records: &[ClassifiedRecord]) -> Aggregation {
    let mut by_relationship: BTreeMap<&str, RelationshipSummary> = BTreeMap::new();

    for record in records {
        let summary = by_relationship
            .entry(record.relationship.as_str())
            .or_insert_with(|| {
                RelationshipSummary::new(record.relationship.clone(), record.category)
            });
        summary.total += 1;
        *summary.bands.entry(record.band).or_insert(0) += 1;
    }

    let mut summaries: Vec<RelationshipSummary> = by_relationship.into_values().collect();
    // Stable sort keeps the name order from the BTreeMap for equal totals
    summaries.sort_by(|a, b| b.total.cmp(&a.total));

    Aggregation {
        summaries,
        total_records: records.len(),
    }
}
