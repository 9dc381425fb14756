//! Shopping list aggregation.
//!
//! Ingredient usage rows from every recipe in a user's cart are merged into
//! one line per ingredient name with the amounts summed. Lines keep the order
//! in which each name was first seen.

use std::collections::HashMap;

/// How much of an ingredient a single recipe requires.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UsageRow {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl UsageRow {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>, amount: i32) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
            amount,
        }
    }
}

/// Total amount of one ingredient across all rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedLine {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

impl std::fmt::Display for AggregatedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) - {}", self.name, self.measurement_unit, self.total)
    }
}

/// Merges usage rows by ingredient name.
///
/// The unit recorded for a name is the one from its first row. A later row
/// with the same name but another unit is still summed and only logged.
pub fn aggregate<I>(rows: I) -> Vec<AggregatedLine>
where
    I: IntoIterator<Item = UsageRow>,
{
    let mut lines: Vec<AggregatedLine> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        match index.get(&row.name) {
            Some(&i) => {
                let line = &mut lines[i];
                if line.measurement_unit != row.measurement_unit {
                    tracing::warn!(
                        ingredient = %row.name,
                        kept_unit = %line.measurement_unit,
                        other_unit = %row.measurement_unit,
                        "Ingredient listed with different units"
                    );
                }
                line.total += i64::from(row.amount);
            }
            None => {
                index.insert(row.name.clone(), lines.len());
                lines.push(AggregatedLine {
                    name: row.name,
                    measurement_unit: row.measurement_unit,
                    total: i64::from(row.amount),
                });
            }
        }
    }

    lines
}

/// Renders the shopping list as `"<name> (<unit>) - <total>"` lines joined by `\n`.
///
/// No rows produce an empty string.
pub fn build_shopping_list<I>(rows: I) -> String
where
    I: IntoIterator<Item = UsageRow>,
{
    aggregate(rows)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
