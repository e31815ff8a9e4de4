//! Plain-text summary of the aggregation
//!
//! Lists every relationship with its category, record count and frequency
//! band breakdown, so the numbers behind the graph can be checked directly.
//! Also lists every distinct frequency text in the input with the band it
//! falls into.

use std::io::{self, Write};

use crate::aggregate::Aggregation;
use crate::classifier::{RelationshipCategory, classify_frequency};

/// Write the summary table to the given writer
pub fn generate_summary<W: Write>(
    aggregation: &Aggregation,
    dropped_rows: usize,
    frequency_values: &[String],
    writer: &mut W,
) -> io::Result<()> {
    let family = aggregation.category_total(RelationshipCategory::Family);
    let non_family = aggregation.category_total(RelationshipCategory::NonFamily);

    writeln!(writer, "Aggressor Relationship Summary")?;
    writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "Records: {} | Dropped (incomplete): {} | Relationships: {}",
        aggregation.total_records(),
        dropped_rows,
        aggregation.summaries().len()
    )?;
    writeln!(
        writer,
        "Family: {} ({}) | Non-family: {} ({})",
        family,
        percentage(family, aggregation.total_records()),
        non_family,
        percentage(non_family, aggregation.total_records())
    )?;
    writeln!(writer)?;

    if aggregation.is_empty() {
        writeln!(writer, "No complete records.")?;
        return write_frequency_values(frequency_values, writer);
    }

    let name_width = aggregation
        .summaries()
        .iter()
        .map(|s| s.relationship.chars().count())
        .max()
        .unwrap_or(0)
        .max("Relationship".len());

    writeln!(
        writer,
        "{:<name_width$}  {:<10}  {:>7}  Frequencies",
        "Relationship", "Category", "Count"
    )?;
    writeln!(writer, "{}", "-".repeat(name_width + 33))?;

    for summary in aggregation.summaries() {
        writeln!(
            writer,
            "{:<name_width$}  {:<10}  {:>7}  {}",
            summary.relationship,
            summary.category.label(),
            summary.total,
            summary.summary_text()
        )?;
    }

    write_frequency_values(frequency_values, writer)
}

fn write_frequency_values<W: Write>(values: &[String], writer: &mut W) -> io::Result<()> {
    if values.is_empty() {
        return Ok(());
    }

    writeln!(writer)?;
    writeln!(writer, "Frequency values ({}):", values.len())?;
    for value in values {
        writeln!(writer, "  {} → {}", value, classify_frequency(value))?;
    }
    Ok(())
}

fn percentage(part: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 * 100.0 / total as f64)
}
