use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::capitalize;
use crate::core::{GroupedData, Row};
use crate::error::{ChartError, ChartResult};

/// Semantic role a data column plays for the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    Group,
    Current,
    Baseline,
}

/// Column metadata for one field of the host's tabular payload. Field order
/// matches column order in the data rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub name: String,
    pub caption: String,
    pub role: FieldRole,
}

impl FieldMeta {
    #[must_use]
    pub fn new(name: impl Into<String>, caption: impl Into<String>, role: FieldRole) -> Self {
        Self {
            name: name.into(),
            caption: caption.into(),
            role,
        }
    }
}

pub(crate) fn column_for_role(fields: &[FieldMeta], role: FieldRole) -> ChartResult<usize> {
    fields
        .iter()
        .position(|field| field.role == role)
        .ok_or_else(|| ChartError::InvalidData(format!("no field declared for role {role:?}")))
}

fn cell_number(cell: Option<&Value>) -> f64 {
    match cell {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

fn cell_label(cell: Option<&Value>) -> String {
    match cell {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Pivots array-of-arrays tabular rows into chart rows: measures are summed
/// per group and groups are sorted descending by baseline. The resulting
/// order is the visual stacking order.
///
/// Malformed measure cells are not validated; they sum to NaN and surface
/// downstream as degenerate geometry.
pub fn shape_rows(data: &[Vec<Value>], fields: &[FieldMeta]) -> ChartResult<Vec<Row>> {
    let group_col = column_for_role(fields, FieldRole::Group)?;
    let current_col = column_for_role(fields, FieldRole::Current)?;
    let baseline_col = column_for_role(fields, FieldRole::Baseline)?;

    let mut sums: IndexMap<String, (f64, f64)> = IndexMap::new();
    for record in data {
        let key = cell_label(record.get(group_col));
        let entry = sums.entry(key).or_insert((0.0, 0.0));
        entry.0 += cell_number(record.get(current_col));
        entry.1 += cell_number(record.get(baseline_col));
    }

    let mut rows: Vec<Row> = sums
        .into_iter()
        .map(|(key, (current, baseline))| Row {
            key,
            current,
            baseline,
        })
        .collect();
    rows.sort_by(|left, right| right.baseline.total_cmp(&left.baseline));
    debug!(
        records = data.len(),
        groups = rows.len(),
        "shaped host data into chart rows"
    );
    Ok(rows)
}

/// Wraps shaped rows into the nested structure the engine consumes, keyed by
/// the capitalized caption of the current-measure field.
pub fn nest_rows(rows: Vec<Row>, fields: &[FieldMeta]) -> ChartResult<GroupedData> {
    let current_col = column_for_role(fields, FieldRole::Current)?;
    Ok(GroupedData {
        key: capitalize(&fields[current_col].caption),
        values: rows,
    })
}
