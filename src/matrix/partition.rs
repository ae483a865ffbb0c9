//! Axis breakpoints from dimension partitions.
//!
//! A dimension with `n` parts yields `n + 1` cumulative percentages, from 0 to
//! 100. The standard layout sizes parts by their leaf count or interval width;
//! the frequency layout sizes them by their marginal frequency.

use crate::data::{DimensionModel, Partition};

/// Share of the span given to a missing-value interval.
pub const MISSING_INTERVAL_SHARE: f64 = 0.05;

/// How cells are sized along the axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisLayout {
    /// Parts sized by leaf count or interval width.
    #[default]
    Standard,
    /// Parts sized by marginal frequency.
    Frequency,
}

impl AxisLayout {
    /// Toggle between the two layouts.
    pub fn toggle(self) -> Self {
        match self {
            Self::Standard => Self::Frequency,
            Self::Frequency => Self::Standard,
        }
    }

    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Frequency => "Frequency",
        }
    }
}

/// Breakpoints of the standard layout.
pub fn standard_breakpoints(dim: &DimensionModel) -> Vec<f64> {
    match &dim.partition {
        Partition::Categorical { groups } => {
            let weights: Vec<f64> = groups
                .iter()
                .map(|g| g.values.len().max(1) as f64)
                .collect();
            cumulate(&weights)
        },
        Partition::Numerical { intervals } => {
            let mut weights: Vec<f64> = intervals.iter().map(|i| i.width().max(0.0)).collect();
            if intervals.first().is_some_and(|i| i.is_missing()) {
                let span: f64 = weights[1..].iter().sum();
                weights[0] = span * MISSING_INTERVAL_SHARE;
            }
            cumulate(&weights)
        },
    }
}

/// Breakpoints of the frequency layout, one marginal per part.
pub fn frequency_breakpoints(marginals: &[f64]) -> Vec<f64> {
    let weights: Vec<f64> = marginals.iter().map(|m| m.max(0.0)).collect();
    cumulate(&weights)
}

/// Breakpoints for a dimension under the given layout.
pub fn breakpoints(dim: &DimensionModel, marginals: &[f64], layout: AxisLayout) -> Vec<f64> {
    match layout {
        AxisLayout::Standard => standard_breakpoints(dim),
        AxisLayout::Frequency => frequency_breakpoints(marginals),
    }
}

/// Cumulative percentages of non-negative weights.
///
/// Weights summing to zero (or to something non-finite) fall back to a
/// uniform split.
fn cumulate(weights: &[f64]) -> Vec<f64> {
    let mut total: f64 = weights.iter().sum();
    let uniform = !(total.is_finite() && total > 0.0);
    if uniform {
        total = weights.len() as f64;
    }

    let mut points = Vec::with_capacity(weights.len() + 1);
    let mut acc = 0.0;
    points.push(acc);
    for &w in weights {
        acc += if uniform { 1.0 } else { w };
        points.push((acc * 100.0 / total).min(100.0));
    }
    if let Some(last) = points.last_mut() {
        if !weights.is_empty() {
            *last = 100.0;
        }
    }
    points
}
