//! Context dimension combinations.
//!
//! Each combination of context part indices owns one series slot on every
//! cell. Combinations are enumerated row-major (first context dimension most
//! significant), which matches the trailing axes of the frequency array.

use crate::data::ClusterTree;
use std::collections::HashMap;

/// Part indices of one context combination, one per context dimension.
pub type ContextKey = Vec<usize>;

/// Selected parts per context dimension.
///
/// An empty list for a dimension leaves it unconstrained. A selection may be
/// partial: picking a folder of the context hierarchy selects every leaf part
/// under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextSelection {
    parts: Vec<Vec<usize>>,
}

impl ContextSelection {
    /// Create a selection from per-dimension part lists.
    pub fn new(parts: Vec<Vec<usize>>) -> Self {
        Self { parts }
    }

    /// Check if no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(Vec::is_empty)
    }

    /// Selected parts of one dimension (empty means all).
    pub fn parts(&self, dim: usize) -> &[usize] {
        self.parts.get(dim).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Constrain one dimension, growing the selection as needed.
    pub fn set(&mut self, dim: usize, parts: Vec<usize>) {
        if self.parts.len() <= dim {
            self.parts.resize(dim + 1, Vec::new());
        }
        self.parts[dim] = parts;
    }

    /// Remove every constraint.
    pub fn clear(&mut self) {
        self.parts.clear();
    }
}

/// Enumeration of context combinations with O(1) key lookups.
#[derive(Debug, Clone)]
pub struct ContextIndex {
    sizes: Vec<usize>,
    keys: Vec<ContextKey>,
    positions: HashMap<ContextKey, usize>,
}

impl ContextIndex {
    /// Enumerate every combination of the given dimension sizes.
    ///
    /// No context dimension yields a single, empty combination.
    pub fn new(sizes: &[usize]) -> Self {
        let mut keys: Vec<ContextKey> = vec![Vec::new()];
        for &size in sizes {
            keys = keys
                .into_iter()
                .flat_map(|prefix| {
                    (0..size).map(move |part| {
                        let mut key = prefix.clone();
                        key.push(part);
                        key
                    })
                })
                .collect();
        }
        let positions = keys
            .iter()
            .enumerate()
            .map(|(pos, key)| (key.clone(), pos))
            .collect();
        Self {
            sizes: sizes.to_vec(),
            keys,
            positions,
        }
    }

    /// Number of combinations (series length).
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if there are no combinations (a context dimension is empty).
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of context dimensions.
    pub fn dimensions(&self) -> usize {
        self.sizes.len()
    }

    /// Series position of a combination, `None` when unknown.
    pub fn position(&self, key: &[usize]) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Combination at a series position.
    pub fn key(&self, pos: usize) -> Option<&[usize]> {
        self.keys.get(pos).map(Vec::as_slice)
    }

    /// Series positions of every combination consistent with a selection.
    ///
    /// Parts that do not exist are skipped rather than reported.
    pub fn expand(&self, selection: &ContextSelection) -> Vec<usize> {
        let mut candidates: Vec<ContextKey> = vec![Vec::new()];
        for (dim, &size) in self.sizes.iter().enumerate() {
            let selected = selection.parts(dim);
            let parts: Vec<usize> = if selected.is_empty() {
                (0..size).collect()
            } else {
                selected.to_vec()
            };
            candidates = candidates
                .into_iter()
                .flat_map(|prefix| {
                    parts.iter().map(move |&part| {
                        let mut key = prefix.clone();
                        key.push(part);
                        key
                    })
                })
                .collect();
        }
        candidates
            .iter()
            .filter_map(|key| self.position(key))
            .collect()
    }
}

/// Indices of the parts lying under a cluster of a context hierarchy.
pub fn parts_under_cluster(tree: &ClusterTree, part_names: &[String], cluster: &str) -> Vec<usize> {
    let Some(idx) = tree.find(cluster) else {
        return Vec::new();
    };
    tree.leaf_names(idx)
        .iter()
        .filter_map(|leaf| part_names.iter().position(|name| name == leaf))
        .collect()
}
