//! Relationship and frequency classification
//!
//! Both classifications are pure functions of their input text. The label sets
//! they match against are fixed constants bundled into a [`Taxonomy`], which is
//! handed to a [`Classifier`] so tests can swap in a different one.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;

use crate::loader::Record;

/// Relationship labels that count as a family member
pub const FAMILY_RELATIONS: [&str; 19] = [
    "EX-COMPANHEIRO(A)",
    "ESPOSA(O)",
    "TIO(A)",
    "COMPANHEIRO(A)",
    "FILHO(A)",
    "IRMÃO(Ã)",
    "MÃE",
    "PAI",
    "NETO(A)",
    "SOBRINHO(A)",
    "GENRO/NORA",
    "CUNHADO(A)",
    "PADRASTO/MADRASTA",
    "PRIMO(A)",
    "AVÔ(Ó)",
    "SOGRO(A)",
    "ENTEADO(A)",
    "PADRINHO/MADRINHA",
    "BISAVÔ(Ó)",
];

/// Band keywords in match priority order
pub const FREQUENCY_KEYWORDS: [(FrequencyBand, &str); 4] = [
    (FrequencyBand::Daily, "DIARIAMENTE"),
    (FrequencyBand::Weekly, "SEMANALMENTE"),
    (FrequencyBand::Monthly, "MENSALMENTE"),
    (FrequencyBand::Other, "OUTROS"),
];

/// Whether the aggressor is a family member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RelationshipCategory {
    Family,
    NonFamily,
}

impl RelationshipCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RelationshipCategory::Family => "Family",
            RelationshipCategory::NonFamily => "Non-family",
        }
    }
}

impl fmt::Display for RelationshipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse bucket for how often incidents happen
///
/// The derived ordering is the display order used in summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FrequencyBand {
    Daily,
    Weekly,
    Monthly,
    Other,
}

impl FrequencyBand {
    pub const ALL: [FrequencyBand; 4] = [
        FrequencyBand::Daily,
        FrequencyBand::Weekly,
        FrequencyBand::Monthly,
        FrequencyBand::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FrequencyBand::Daily => "Daily",
            FrequencyBand::Weekly => "Weekly",
            FrequencyBand::Monthly => "Monthly",
            FrequencyBand::Other => "Other",
        }
    }
}

impl fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The label sets used for classification
#[derive(Debug, Clone)]
pub struct Taxonomy {
    family_relations: HashSet<String>,
    /// Upper-cased keywords, checked in order
    frequency_keywords: Vec<(FrequencyBand, String)>,
}

impl Taxonomy {
    pub fn new<R, K>(family_relations: R, frequency_keywords: K) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        K: IntoIterator<Item = (FrequencyBand, String)>,
    {
        Self {
            family_relations: family_relations.into_iter().map(Into::into).collect(),
            frequency_keywords: frequency_keywords
                .into_iter()
                .map(|(band, keyword)| (band, keyword.to_uppercase()))
                .collect(),
        }
    }

    pub fn is_family(&self, relationship: &str) -> bool {
        self.family_relations.contains(relationship)
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::new(
            FAMILY_RELATIONS,
            FREQUENCY_KEYWORDS
                .iter()
                .map(|(band, keyword)| (*band, keyword.to_string())),
        )
    }
}

/// A record with its derived labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRecord {
    pub relationship: String,
    pub category: RelationshipCategory,
    pub band: FrequencyBand,
}

/// Applies a [`Taxonomy`] to records
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    taxonomy: Taxonomy,
}

impl Classifier {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn classify_relationship(&self, relationship: &str) -> RelationshipCategory {
        if self.taxonomy.is_family(relationship) {
            RelationshipCategory::Family
        } else {
            RelationshipCategory::NonFamily
        }
    }

    /// First keyword found in the upper-cased text wins
    pub fn classify_frequency(&self, text: &str) -> FrequencyBand {
        let upper = text.to_uppercase();
        self.taxonomy
            .frequency_keywords
            .iter()
            .find(|(_, keyword)| upper.contains(keyword.as_str()))
            .map(|(band, _)| *band)
            .unwrap_or(FrequencyBand::Other)
    }

    pub fn classify_record(&self, record: &Record) -> ClassifiedRecord {
        ClassifiedRecord {
            relationship: record.relationship.clone(),
            category: self.classify_relationship(&record.relationship),
            band: self.classify_frequency(&record.frequency_text),
        }
    }

    pub fn classify(&self, records: &[Record]) -> Vec<ClassifiedRecord> {
        records.iter().map(|r| self.classify_record(r)).collect()
    }
}

static DEFAULT_CLASSIFIER: LazyLock<Classifier> = LazyLock::new(Classifier::default);

/// Classify a relationship against the fixed family list
pub fn classify_relationship(relationship: &str) -> RelationshipCategory {
    DEFAULT_CLASSIFIER.classify_relationship(relationship)
}

/// Classify a frequency text against the fixed keyword list
pub fn classify_frequency(text: &str) -> FrequencyBand {
    DEFAULT_CLASSIFIER.classify_frequency(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_family_label_is_family() {
        let classifier = Classifier::default();
        for label in FAMILY_RELATIONS {
            assert_eq!(classify_relationship(label), RelationshipCategory::Family);
            assert_eq!(
                classifier.classify_relationship(label),
                RelationshipCategory::Family
            );
        }
    }

    #[test]
    fn test_non_family_labels() {
        for label in ["VIZINHO(A)", "DESCONHECIDO", "AMIGO(A)", "esposa(o)", "PAI ", ""] {
            assert_eq!(
                classify_relationship(label),
                RelationshipCategory::NonFamily,
                "{label:?}"
            );
        }
    }

    #[test]
    fn test_frequency_keywords_any_case_any_position() {
        assert_eq!(classify_frequency("DIARIAMENTE"), FrequencyBand::Daily);
        assert_eq!(classify_frequency("quase diariamente"), FrequencyBand::Daily);
        assert_eq!(classify_frequency("Semanalmente, às vezes"), FrequencyBand::Weekly);
        assert_eq!(classify_frequency("xMensalmentex"), FrequencyBand::Monthly);
        assert_eq!(classify_frequency("OUTROS"), FrequencyBand::Other);
        assert_eq!(classify_frequency("ANUALMENTE"), FrequencyBand::Other);
        assert_eq!(classify_frequency("NÃO INFORMADO"), FrequencyBand::Other);
    }

    #[test]
    fn test_first_keyword_wins() {
        assert_eq!(
            classify_frequency("MENSALMENTE OU DIARIAMENTE"),
            FrequencyBand::Daily
        );
        assert_eq!(
            classify_frequency("mensalmente e semanalmente"),
            FrequencyBand::Weekly
        );
    }

    #[test]
    fn test_free_functions_match_default_classifier() {
        let classifier = Classifier::default();
        for text in ["diariamente", "SEMANALMENTE", "mensal", "OUTROS", "?"] {
            assert_eq!(classifier.classify_frequency(text), classify_frequency(text));
        }
        for label in ["PAI", "BISAVÔ(Ó)", "VIZINHO(A)", "pai"] {
            assert_eq!(
                classifier.classify_relationship(label),
                classify_relationship(label)
            );
        }
    }

    #[test]
    fn test_alternate_taxonomy() {
        let taxonomy = Taxonomy::new(
            ["VIZINHO(A)"],
            vec![
                (FrequencyBand::Weekly, "weekly".to_string()),
                (FrequencyBand::Daily, "daily".to_string()),
            ],
        );
        let classifier = Classifier::new(taxonomy);

        assert_eq!(
            classifier.classify_relationship("VIZINHO(A)"),
            RelationshipCategory::Family
        );
        assert_eq!(
            classifier.classify_relationship("PAI"),
            RelationshipCategory::NonFamily
        );
        assert_eq!(classifier.classify_frequency("Daily"), FrequencyBand::Daily);
        assert_eq!(
            classifier.classify_frequency("daily or weekly"),
            FrequencyBand::Weekly
        );
        assert_eq!(
            classifier.classify_frequency("DIARIAMENTE"),
            FrequencyBand::Other
        );
    }

    #[test]
    fn test_classify_records() {
        let records = vec![
            Record::new("ESPOSA(O)", "DIARIAMENTE"),
            Record::new("VIZINHO(A)", "mensalmente"),
        ];
        let classified = Classifier::default().classify(&records);

        assert_eq!(classified[0].category, RelationshipCategory::Family);
        assert_eq!(classified[0].band, FrequencyBand::Daily);
        assert_eq!(classified[1].category, RelationshipCategory::NonFamily);
        assert_eq!(classified[1].band, FrequencyBand::Monthly);
    }
}
