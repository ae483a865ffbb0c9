//! Dimension partition contracts.

use serde::Deserialize;

/// Label shown for the missing-value interval of a numerical dimension.
pub const MISSING_LABEL: &str = "Missing";

/// Type of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionType {
    /// Values grouped into categories.
    Categorical,
    /// Values split into contiguous intervals.
    Numerical,
}

/// A group of categorical values forming one axis part.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValueGroup {
    /// Cluster name of the group.
    pub name: String,
    /// Leaf values composing the group.
    #[serde(default)]
    pub values: Vec<String>,
}

/// A numeric interval forming one axis part.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Interval {
    /// Cluster name, defaults to the interval label.
    #[serde(default)]
    pub name: Option<String>,
    /// Lower and upper bounds, `None` for the missing-value interval.
    #[serde(default)]
    pub bounds: Option<[f64; 2]>,
}

impl Interval {
    /// Create a bounded interval.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            name: None,
            bounds: Some([lower, upper]),
        }
    }

    /// Create the missing-value interval.
    pub fn missing() -> Self {
        Self {
            name: None,
            bounds: None,
        }
    }

    /// Width of the interval, 0 for the missing-value interval.
    pub fn width(&self) -> f64 {
        self.bounds.map(|[lo, hi]| hi - lo).unwrap_or(0.0)
    }

    /// Check if this is the missing-value interval.
    pub fn is_missing(&self) -> bool {
        self.bounds.is_none()
    }
}

/// Partition content of a dimension.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Partition {
    /// Categorical value groups.
    Categorical {
        /// Groups in axis order.
        groups: Vec<ValueGroup>,
    },
    /// Numerical intervals.
    Numerical {
        /// Intervals in axis order.
        intervals: Vec<Interval>,
    },
}

/// One partitioned dimension of the contingency table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DimensionModel {
    /// Variable name.
    pub name: String,
    /// Partition of the variable.
    #[serde(flatten)]
    pub partition: Partition,
}

impl DimensionModel {
    /// Create a categorical dimension.
    pub fn categorical(name: impl Into<String>, groups: Vec<ValueGroup>) -> Self {
        Self {
            name: name.into(),
            partition: Partition::Categorical { groups },
        }
    }

    /// Create a numerical dimension.
    pub fn numerical(name: impl Into<String>, intervals: Vec<Interval>) -> Self {
        Self {
            name: name.into(),
            partition: Partition::Numerical { intervals },
        }
    }

    /// Get the dimension type.
    pub fn dimension_type(&self) -> DimensionType {
        match self.partition {
            Partition::Categorical { .. } => DimensionType::Categorical,
            Partition::Numerical { .. } => DimensionType::Numerical,
        }
    }

    /// Number of parts along this axis.
    pub fn parts(&self) -> usize {
        match &self.partition {
            Partition::Categorical { groups } => groups.len(),
            Partition::Numerical { intervals } => intervals.len(),
        }
    }

    /// Display labels of every part, in axis order.
    ///
    /// Numerical parts render as `[a,b]` for the first bounded interval and
    /// `]a,b]` afterwards. Categorical parts list their leaf values.
    pub fn part_labels(&self) -> Vec<String> {
        match &self.partition {
            Partition::Categorical { groups } => groups
                .iter()
                .map(|g| {
                    if g.values.is_empty() {
                        g.name.clone()
                    } else {
                        g.values.join(", ")
                    }
                })
                .collect(),
            Partition::Numerical { intervals } => {
                let mut first_bounded = true;
                intervals
                    .iter()
                    .map(|interval| match interval.bounds {
                        None => MISSING_LABEL.to_string(),
                        Some([lo, hi]) => {
                            let open = if first_bounded { '[' } else { ']' };
                            first_bounded = false;
                            format!("{}{},{}]", open, lo, hi)
                        },
                    })
                    .collect()
            },
        }
    }

    /// Cluster identities of every part, in axis order.
    pub fn part_names(&self) -> Vec<String> {
        match &self.partition {
            Partition::Categorical { groups } => groups.iter().map(|g| g.name.clone()).collect(),
            Partition::Numerical { intervals } => intervals
                .iter()
                .zip(self.part_labels())
                .map(|(interval, label)| interval.name.clone().unwrap_or(label))
                .collect(),
        }
    }
}
