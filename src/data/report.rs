//! Matrix document reader.
//!
//! The document is translated once into a typed [`MatrixInput`]; nothing
//! downstream sees raw JSON.

use super::dimension::DimensionModel;
use super::tree::{ClusterLink, ClusterTree};
use crate::error::{ComatrixError, Result};
use crate::matrix::MatrixMode;
use ndarray::{ArrayD, IxDyn};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Names of the two plotted variables.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableNames {
    /// Variable on the x axis.
    pub name_x: String,
    /// Variable on the y axis.
    pub name_y: String,
}

#[derive(Debug, Deserialize)]
struct DocumentDimensions {
    x: DimensionModel,
    y: DimensionModel,
    #[serde(default)]
    context: Vec<DimensionModel>,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentHierarchies {
    #[serde(default)]
    x: Vec<ClusterLink>,
    #[serde(default)]
    y: Vec<ClusterLink>,
    #[serde(default)]
    context: Vec<Vec<ClusterLink>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatrixDocument {
    #[serde(default)]
    variable: Option<VariableNames>,
    dimensions: DocumentDimensions,
    frequencies: Vec<f64>,
    #[serde(default)]
    hierarchies: DocumentHierarchies,
    #[serde(default)]
    min_max_values: HashMap<String, [f64; 2]>,
}

/// Typed input of the visualization engine.
#[derive(Debug, Clone)]
pub struct MatrixInput {
    /// Plotted variable names.
    pub variable: VariableNames,
    /// Dimension on the x axis.
    pub x: DimensionModel,
    /// Dimension on the y axis.
    pub y: DimensionModel,
    /// Context dimensions, possibly none.
    pub contexts: Vec<DimensionModel>,
    /// Frequencies of shape `[x parts, y parts, context parts...]`.
    pub frequencies: ArrayD<f64>,
    /// Cluster hierarchy of the x axis.
    pub x_tree: ClusterTree,
    /// Cluster hierarchy of the y axis.
    pub y_tree: ClusterTree,
    /// Cluster hierarchy of each context dimension.
    pub context_trees: Vec<ClusterTree>,
    /// Externally supplied value range per mode.
    pub min_max_values: HashMap<MatrixMode, (f64, f64)>,
}

impl MatrixInput {
    /// Create an input with flat hierarchies, validating the frequency shape.
    pub fn new(
        x: DimensionModel,
        y: DimensionModel,
        contexts: Vec<DimensionModel>,
        frequencies: ArrayD<f64>,
    ) -> Result<Self> {
        let mut expected = vec![x.parts(), y.parts()];
        expected.extend(contexts.iter().map(|d| d.parts()));
        if frequencies.shape() != expected.as_slice() {
            return Err(ComatrixError::invalid_input(format!(
                "frequency shape {:?} does not match dimensions {:?}",
                frequencies.shape(),
                expected
            )));
        }
        if let Some(bad) = frequencies.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(ComatrixError::invalid_input(format!(
                "frequencies must be finite and non-negative, found {}",
                bad
            )));
        }

        let variable = VariableNames {
            name_x: x.name.clone(),
            name_y: y.name.clone(),
        };
        let x_tree = ClusterTree::flat(&x.part_names())?;
        let y_tree = ClusterTree::flat(&y.part_names())?;
        let context_trees = contexts
            .iter()
            .map(|d| ClusterTree::flat(&d.part_names()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            variable,
            x,
            y,
            contexts,
            frequencies,
            x_tree,
            y_tree,
            context_trees,
            min_max_values: HashMap::new(),
        })
    }

    /// Replace the axis hierarchies. Empty link lists keep the flat default.
    pub fn with_hierarchies(mut self, x: &[ClusterLink], y: &[ClusterLink]) -> Result<Self> {
        if !x.is_empty() {
            self.x_tree = checked_tree(x, &self.x)?;
        }
        if !y.is_empty() {
            self.y_tree = checked_tree(y, &self.y)?;
        }
        Ok(self)
    }

    /// Parse a matrix document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: MatrixDocument = serde_json::from_str(json)?;
        let dims = doc.dimensions;

        let mut shape = vec![dims.x.parts(), dims.y.parts()];
        shape.extend(dims.context.iter().map(|d| d.parts()));
        let frequencies = ArrayD::from_shape_vec(IxDyn(&shape), doc.frequencies).map_err(|e| {
            ComatrixError::invalid_input(format!("Invalid shape/data size: {}", e))
        })?;

        let mut input = Self::new(dims.x, dims.y, dims.context, frequencies)?
            .with_hierarchies(&doc.hierarchies.x, &doc.hierarchies.y)?;

        for (dim, links) in doc.hierarchies.context.iter().enumerate() {
            let Some(model) = input.contexts.get(dim) else {
                return Err(ComatrixError::invalid_input(format!(
                    "hierarchy given for missing context dimension {}",
                    dim
                )));
            };
            if !links.is_empty() {
                input.context_trees[dim] = checked_tree(links, model)?;
            }
        }

        if let Some(variable) = doc.variable {
            input.variable = variable;
        }

        for (key, [min, max]) in doc.min_max_values {
            match key.parse::<MatrixMode>() {
                Ok(mode) => {
                    input.min_max_values.insert(mode, (min, max));
                },
                Err(e) => tracing::warn!("Ignoring min/max values: {}", e),
            }
        }

        Ok(input)
    }

    /// Read a matrix document from disk.
    pub fn read_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ComatrixError::file_open(path.to_path_buf(), e))?;
        let input = Self::from_json_str(&text)?;
        tracing::info!(
            "Loaded {} x {} matrix with {} context dimensions from {}",
            input.x.parts(),
            input.y.parts(),
            input.contexts.len(),
            path.display()
        );
        Ok(input)
    }
}

/// Build a hierarchy and check that every axis part is one of its leaves.
fn checked_tree(links: &[ClusterLink], dim: &DimensionModel) -> Result<ClusterTree> {
    let tree = ClusterTree::from_links(links)?;
    for part in dim.part_names() {
        match tree.find(&part).and_then(|idx| tree.node(idx)) {
            None => {
                return Err(ComatrixError::invalid_input(format!(
                    "part '{}' of '{}' is missing from its hierarchy",
                    part, dim.name
                )))
            },
            Some(node) if !node.is_leaf() => {
                return Err(ComatrixError::invalid_input(format!(
                    "part '{}' of '{}' is not a leaf of its hierarchy",
                    part, dim.name
                )))
            },
            Some(_) => {},
        }
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "variable": { "nameX": "Color", "nameY": "Size" },
        "dimensions": {
            "x": { "name": "Color", "type": "Categorical",
                   "groups": [ { "name": "A", "values": ["red"] },
                               { "name": "B", "values": ["blue"] } ] },
            "y": { "name": "Size", "type": "Numerical",
                   "intervals": [ { "bounds": [0, 1] }, { "bounds": [1, 2] } ] }
        },
        "frequencies": [1, 2, 3, 4],
        "hierarchies": {
            "x": [ { "name": "root" }, { "name": "A", "parent": "root" },
                   { "name": "B", "parent": "root" } ]
        },
        "minMaxValues": { "MUTUAL_INFO": [-0.5, 0.5], "BOGUS": [0, 1] }
    }"#;

    #[test]
    fn test_parse_document() {
        let input = MatrixInput::from_json_str(DOC).unwrap();
        assert_eq!(input.variable.name_x, "Color");
        assert_eq!(input.frequencies.shape(), &[2, 2]);
        assert_eq!(input.frequencies[[1, 0]], 3.0);
        assert!(input.x_tree.find("root").is_some());
        assert!(input.y_tree.find("[0,1]").is_some());
        assert_eq!(input.min_max_values.get(&MatrixMode::MutualInfo), Some(&(-0.5, 0.5)));
        assert_eq!(input.min_max_values.len(), 1);
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let doc = DOC.replace("[1, 2, 3, 4]", "[1, 2, 3]");
        let err = MatrixInput::from_json_str(&doc).unwrap_err();
        assert!(matches!(err, ComatrixError::InvalidInput { .. }));
    }

    #[test]
    fn test_negative_frequency_is_rejected() {
        let doc = DOC.replace("[1, 2, 3, 4]", "[1, -2, 3, 4]");
        assert!(MatrixInput::from_json_str(&doc).is_err());
    }

    #[test]
    fn test_hierarchy_must_cover_parts() {
        let doc = DOC.replace(r#"{ "name": "B", "parent": "root" }"#, r#"{ "name": "Z", "parent": "root" }"#);
        let err = MatrixInput::from_json_str(&doc).unwrap_err();
        assert!(err.to_string().contains("'B'"));
    }

    #[test]
    fn test_cyclic_hierarchy_is_rejected() {
        let doc = DOC
            .replace(
                r#"{ "name": "root" }, { "name": "A", "parent": "root" }"#,
                r#"{ "name": "A", "parent": "B" }"#,
            )
            .replace(r#"{ "name": "B", "parent": "root" }"#, r#"{ "name": "B", "parent": "A" }"#);
        let err = MatrixInput::from_json_str(&doc).unwrap_err();
        assert!(matches!(err, ComatrixError::InvalidInput { .. }));
        assert!(err.to_string().contains("own ancestor"));
    }

    #[test]
    fn test_parts_must_be_leaves() {
        let doc = DOC.replace(
            r#"{ "name": "B", "parent": "root" } ]"#,
            r#"{ "name": "B", "parent": "root" }, { "name": "A1", "parent": "A" } ]"#,
        );
        let err = MatrixInput::from_json_str(&doc).unwrap_err();
        assert!(err.to_string().contains("'A' of 'Color' is not a leaf"));
    }

    #[test]
    fn test_part_named_like_flat_root_is_rejected() {
        let doc = DOC.replace(r#""name": "B", "values""#, r#""name": "*", "values""#);
        assert!(MatrixInput::from_json_str(&doc).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = MatrixInput::read_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ComatrixError::FileOpen { .. }));
    }
}
