//! Group keys, aggregation kinds and the grouped result they produce.

use crate::stats::StatsCalculator;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Value of a grouping column for one partition.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Number(f64),
    Label(String),
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Number(a), GroupKey::Number(b)) => a.total_cmp(b),
            (GroupKey::Label(a), GroupKey::Label(b)) => a.cmp(b),
            (GroupKey::Number(_), GroupKey::Label(_)) => Ordering::Less,
            (GroupKey::Label(_), GroupKey::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            GroupKey::Number(n) => write!(f, "{}", n),
            GroupKey::Label(s) => f.write_str(s),
        }
    }
}

/// A user-supplied reduction over a group's numeric values.
#[derive(Clone, Copy)]
pub struct NamedReducer {
    pub name: &'static str,
    pub func: fn(&[f64]) -> f64,
}

impl fmt::Debug for NamedReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedReducer").field("name", &self.name).finish()
    }
}

/// How a group's values are reduced to a single number.
#[derive(Debug, Clone, Copy)]
pub enum Aggregation {
    Mean,
    Sum,
    /// Non-missing values; the only aggregation accepted on non-numeric columns.
    Count,
    Min,
    Max,
    Median,
    /// Sample standard deviation.
    Std,
    Custom(NamedReducer),
}

impl Aggregation {
    pub fn name(&self) -> &'static str {
        match self {
            Aggregation::Mean => "mean",
            Aggregation::Sum => "sum",
            Aggregation::Count => "count",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Median => "median",
            Aggregation::Std => "std",
            Aggregation::Custom(r) => r.name,
        }
    }

    pub fn requires_numeric(&self) -> bool {
        !matches!(self, Aggregation::Count)
    }

    /// Reduce the non-missing values of one group.
    ///
    /// Empty groups give `NaN`, except `Sum` (0) and `Count` (0).
    pub fn apply(&self, values: &[f64]) -> f64 {
        match self {
            Aggregation::Count => values.len() as f64,
            Aggregation::Sum => values.iter().sum(),
            _ if values.is_empty() => f64::NAN,
            Aggregation::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Aggregation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregation::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(|a, b| a.total_cmp(b));
                StatsCalculator::percentile(&sorted, 50.0)
            }
            Aggregation::Std => values.iter().std_dev(),
            Aggregation::Custom(r) => (r.func)(values),
        }
    }
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" | "avg" => Ok(Aggregation::Mean),
            "sum" => Ok(Aggregation::Sum),
            "count" => Ok(Aggregation::Count),
            "min" => Ok(Aggregation::Min),
            "max" => Ok(Aggregation::Max),
            "median" => Ok(Aggregation::Median),
            "std" => Ok(Aggregation::Std),
            other => Err(format!("unknown aggregation '{}'", other)),
        }
    }
}

/// Aggregation for the value column: one for everything, or one per column name.
#[derive(Debug, Clone)]
pub enum AggSpec {
    Single(Aggregation),
    ByColumn(BTreeMap<String, Aggregation>),
}

impl AggSpec {
    pub fn resolve(&self, column: &str) -> Option<Aggregation> {
        match self {
            AggSpec::Single(agg) => Some(*agg),
            AggSpec::ByColumn(map) => map.get(column).copied(),
        }
    }
}

impl From<Aggregation> for AggSpec {
    fn from(agg: Aggregation) -> Self {
        AggSpec::Single(agg)
    }
}

/// One aggregate value per group key.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedAggregate {
    pub key_column: String,
    pub value_column: String,
    pub aggregation: String,
    pub entries: Vec<(GroupKey, f64)>,
}

impl GroupedAggregate {
    /// Reduce every group with `agg`; entries come out in key order.
    pub fn from_groups(
        key_column: &str,
        value_column: &str,
        agg: &Aggregation,
        groups: BTreeMap<GroupKey, Vec<f64>>,
    ) -> Self {
        let entries = groups
            .into_iter()
            .map(|(key, values)| {
                let value = agg.apply(&values);
                (key, value)
            })
            .collect();

        Self {
            key_column: key_column.to_string(),
            value_column: value_column.to_string(),
            aggregation: agg.name().to_string(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a group by its display form, e.g. `"Fog"` or `"12"`.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k.to_string() == key)
            .map(|(_, v)| *v)
    }

    pub fn get_key(&self, key: &GroupKey) -> Option<f64> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    /// Keys rendered as strings, for axis labels.
    pub fn labels(&self) -> Vec<String> {
        self.keys().map(|k| k.to_string()).collect()
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }
}
