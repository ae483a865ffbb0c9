//! Cluster hierarchy of one axis.
//!
//! Nodes live in an arena and point to their parent by index, so the
//! back-reference never owns anything. The leaf closure of a node is computed
//! on first use and cached.

use crate::error::{ComatrixError, Result};
use serde::Deserialize;
use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};

/// Name of the synthetic root of a flat hierarchy.
pub const FLAT_ROOT_NAME: &str = "*";

/// Parent link of one cluster, as found in a matrix document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClusterLink {
    /// Cluster name.
    pub name: String,
    /// Parent cluster name, `None` for a root.
    #[serde(default)]
    pub parent: Option<String>,
}

impl ClusterLink {
    /// Create a link.
    pub fn new(name: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            name: name.into(),
            parent: parent.map(str::to_string),
        }
    }
}

/// A cluster in the hierarchy.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Cluster name.
    pub name: String,
    /// Index of the parent cluster.
    pub parent_cluster: Option<usize>,
    /// Indices of the child clusters.
    pub children: Vec<usize>,
    children_leaf_list: OnceCell<Vec<String>>,
}

impl TreeNode {
    fn new(name: String) -> Self {
        Self {
            name,
            parent_cluster: None,
            children: Vec::new(),
            children_leaf_list: OnceCell::new(),
        }
    }

    /// Check if this cluster is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Cluster hierarchy of one axis.
#[derive(Debug, Clone, Default)]
pub struct ClusterTree {
    nodes: Vec<TreeNode>,
    by_name: HashMap<String, usize>,
}

impl ClusterTree {
    /// Build a one-level hierarchy: a synthetic root over every leaf.
    ///
    /// Fails when two leaves share a name or a leaf is named like the root.
    pub fn flat(leaves: &[String]) -> Result<Self> {
        let mut links = vec![ClusterLink::new(FLAT_ROOT_NAME, None)];
        links.extend(
            leaves
                .iter()
                .map(|leaf| ClusterLink::new(leaf.clone(), Some(FLAT_ROOT_NAME))),
        );
        Self::from_links(&links)
    }

    /// Build a hierarchy from parent links, in any order.
    pub fn from_links(links: &[ClusterLink]) -> Result<Self> {
        let mut tree = Self::default();
        for link in links {
            if tree.by_name.contains_key(&link.name) {
                return Err(ComatrixError::invalid_input(format!(
                    "duplicate cluster '{}'",
                    link.name
                )));
            }
            tree.by_name.insert(link.name.clone(), tree.nodes.len());
            tree.nodes.push(TreeNode::new(link.name.clone()));
        }

        for (idx, link) in links.iter().enumerate() {
            if let Some(ref parent) = link.parent {
                let parent_idx = *tree
                    .by_name
                    .get(parent)
                    .ok_or_else(|| ComatrixError::unknown_parent(&link.name, parent))?;
                tree.nodes[idx].parent_cluster = Some(parent_idx);
                tree.nodes[parent_idx].children.push(idx);
            }
        }

        if let Some(idx) = (0..tree.nodes.len()).find(|&i| tree.in_cycle(i)) {
            return Err(ComatrixError::invalid_input(format!(
                "cluster '{}' is its own ancestor",
                tree.nodes[idx].name
            )));
        }

        Ok(tree)
    }

    fn in_cycle(&self, idx: usize) -> bool {
        let mut current = self.nodes[idx].parent_cluster;
        for _ in 0..self.nodes.len() {
            match current {
                Some(i) if i == idx => return true,
                Some(i) => current = self.nodes[i].parent_cluster,
                None => return false,
            }
        }
        false
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the hierarchy is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a cluster by index.
    pub fn node(&self, idx: usize) -> Option<&TreeNode> {
        self.nodes.get(idx)
    }

    /// Find a cluster index by name.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Every cluster in depth-first order, roots in link order.
    pub fn preorder(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent_cluster.is_none())
            .map(|(i, _)| i)
            .rev()
            .collect();
        while let Some(i) = stack.pop() {
            order.push(i);
            stack.extend(self.nodes[i].children.iter().rev());
        }
        order
    }

    /// Chain from a cluster up to its root, the cluster itself first.
    pub fn ancestor_chain(&self, idx: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut current = Some(idx);
        while let Some(i) = current {
            // Guard against malformed cyclic input
            if chain.contains(&i) {
                break;
            }
            chain.push(i);
            current = self.nodes.get(i).and_then(|n| n.parent_cluster);
        }
        chain
    }

    /// Lowest cluster that is an ancestor of every named cluster.
    ///
    /// Returns `None` when a name is unknown or the clusters live in
    /// different roots.
    pub fn lowest_common_ancestor(&self, names: &[&str]) -> Option<usize> {
        let chains: Vec<Vec<usize>> = names
            .iter()
            .map(|name| self.find(name).map(|idx| self.ancestor_chain(idx)))
            .collect::<Option<_>>()?;
        let (first, rest) = chains.split_first()?;
        first
            .iter()
            .copied()
            .find(|candidate| rest.iter().all(|chain| chain.contains(candidate)))
    }

    /// Names of every leaf under a cluster, in hierarchy order.
    pub fn leaf_names(&self, idx: usize) -> &[String] {
        let Some(node) = self.nodes.get(idx) else {
            return &[];
        };
        node.children_leaf_list.get_or_init(|| {
            let mut leaves = Vec::new();
            let mut visited = HashSet::new();
            let mut stack = vec![idx];
            while let Some(i) = stack.pop() {
                if !visited.insert(i) {
                    continue;
                }
                let n = &self.nodes[i];
                if n.is_leaf() {
                    leaves.push(n.name.clone());
                } else {
                    stack.extend(n.children.iter().rev());
                }
            }
            leaves
        })
    }
}
