//! Rectangle picking and hierarchy-aware selection expansion.

use crate::data::ClusterTree;
use crate::matrix::CellModel;
use std::collections::HashSet;

/// Cells whose center lies in the box spanned by two corner cells.
///
/// The box is inclusive and covers both corner cells entirely, whichever
/// order they are given in.
pub fn cells_in_rect<'a>(
    start: &CellModel,
    end: &CellModel,
    cells: &'a [CellModel],
) -> Vec<&'a CellModel> {
    let x0 = start.x_canvas.min(end.x_canvas);
    let x1 = (start.x_canvas + start.w_canvas).max(end.x_canvas + end.w_canvas);
    let y0 = start.y_canvas.min(end.y_canvas);
    let y1 = (start.y_canvas + start.h_canvas).max(end.y_canvas + end.h_canvas);
    cells
        .iter()
        .filter(|c| {
            let (cx, cy) = c.center();
            cx >= x0 && cx <= x1 && cy >= y0 && cy <= y1
        })
        .collect()
}

/// Clusters of one axis after expansion, and whether they grew.
fn expand_axis(tree: &ClusterTree, parts: &[&str]) -> (HashSet<String>, bool) {
    let mut distinct: Vec<&str> = Vec::new();
    for &part in parts {
        if !distinct.contains(&part) {
            distinct.push(part);
        }
    }
    let original = || distinct.iter().map(|s| s.to_string()).collect();
    if distinct.len() < 2 {
        return (original(), false);
    }
    match tree.lowest_common_ancestor(&distinct) {
        Some(lca) => (tree.leaf_names(lca).iter().cloned().collect(), true),
        None => {
            tracing::debug!("No common ancestor for {:?}", distinct);
            (original(), false)
        },
    }
}

/// Grow a selection to every cell under the lowest common ancestors of its
/// x and y clusters.
///
/// Selections of at most one cell and selections that cannot grow on
/// either axis are returned unchanged.
pub fn expand_to_hierarchy<'a>(
    selected: &[&'a CellModel],
    cells: &'a [CellModel],
    x_tree: &ClusterTree,
    y_tree: &ClusterTree,
) -> Vec<&'a CellModel> {
    if selected.len() <= 1 {
        return selected.to_vec();
    }
    let xs: Vec<&str> = selected.iter().map(|c| c.xaxis_part.as_str()).collect();
    let ys: Vec<&str> = selected.iter().map(|c| c.yaxis_part.as_str()).collect();
    let (x_set, x_grew) = expand_axis(x_tree, &xs);
    let (y_set, y_grew) = expand_axis(y_tree, &ys);
    if !x_grew && !y_grew {
        return selected.to_vec();
    }
    cells
        .iter()
        .filter(|c| x_set.contains(&c.xaxis_part) && y_set.contains(&c.yaxis_part))
        .collect()
}
