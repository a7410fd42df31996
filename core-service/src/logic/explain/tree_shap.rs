//! Path-dependent TreeSHAP
//!
//! Exact Shapley values for one tree in polynomial time, using the training
//! cover of each node to weight the branches not taken. Values are additive
//! in the tree's output space: `expected_value + sum(phi) == tree.predict(x)`.

use ndarray::ArrayView1;

use crate::logic::model::classifier::{Tree, TreeNode};

#[derive(Debug, Clone, Copy)]
struct PathElement {
    feature: Option<usize>,
    zero: f64,   // fraction of cover flowing down this path when the feature is missing
    one: f64,    // 1 if x follows this path, else 0
    weight: f64, // permutation weight
}

/// Cover-weighted mean leaf value of `node`'s subtree
pub fn expected_value(tree: &Tree, node: usize) -> f64 {
    match &tree.nodes[node] {
        TreeNode::Leaf { value, .. } => *value,
        TreeNode::Split { left, right, cover, .. } => {
            let total = cover.unwrap_or(1.0);
            let left_cover = tree.nodes[*left].cover().unwrap_or(0.0);
            let right_cover = tree.nodes[*right].cover().unwrap_or(0.0);
            (left_cover * expected_value(tree, *left) + right_cover * expected_value(tree, *right))
                / total
        }
    }
}

/// Every node needs a positive cover for the branch weights to exist
pub fn check_covers(tree: &Tree) -> Result<(), String> {
    for (i, node) in tree.nodes.iter().enumerate() {
        match node.cover() {
            Some(cover) if cover > 0.0 && cover.is_finite() => {}
            Some(cover) => return Err(format!("node {} has cover {}", i, cover)),
            None => return Err(format!("node {} has no cover", i)),
        }
    }
    Ok(())
}

/// Add one tree's Shapley values for `row` into `phi`
pub fn accumulate(tree: &Tree, row: ArrayView1<'_, f64>, phi: &mut [f64]) {
    recurse(tree, row, phi, 0, &[], 1.0, 1.0, None);
}

#[allow(clippy::too_many_arguments)]
fn recurse(
    tree: &Tree,
    row: ArrayView1<'_, f64>,
    phi: &mut [f64],
    node: usize,
    parent_path: &[PathElement],
    zero: f64,
    one: f64,
    feature: Option<usize>,
) {
    let mut path = Vec::with_capacity(parent_path.len() + 1);
    path.extend_from_slice(parent_path);
    extend(&mut path, zero, one, feature);

    match &tree.nodes[node] {
        TreeNode::Leaf { value, .. } => {
            for i in 1..path.len() {
                let element = path[i];
                let w = unwound_sum(&path, i);
                if let Some(f) = element.feature {
                    phi[f] += w * (element.one - element.zero) * value;
                }
            }
        }
        TreeNode::Split { feature: split, threshold, left, right, cover } => {
            let (hot, cold) = if row[*split] <= *threshold {
                (*left, *right)
            } else {
                (*right, *left)
            };
            let total = cover.unwrap_or(1.0);
            let hot_zero = tree.nodes[hot].cover().unwrap_or(0.0) / total;
            let cold_zero = tree.nodes[cold].cover().unwrap_or(0.0) / total;

            // A feature split on twice along the path keeps a single element
            let mut incoming_zero = 1.0;
            let mut incoming_one = 1.0;
            if let Some(index) = path.iter().position(|e| e.feature == Some(*split)) {
                incoming_zero = path[index].zero;
                incoming_one = path[index].one;
                unwind(&mut path, index);
            }

            recurse(tree, row, phi, hot, &path, hot_zero * incoming_zero, incoming_one, Some(*split));
            recurse(tree, row, phi, cold, &path, cold_zero * incoming_zero, 0.0, Some(*split));
        }
    }
}

fn extend(path: &mut Vec<PathElement>, zero: f64, one: f64, feature: Option<usize>) {
    let depth = path.len();
    path.push(PathElement {
        feature,
        zero,
        one,
        weight: if depth == 0 { 1.0 } else { 0.0 },
    });

    let denom = (depth + 1) as f64;
    for i in (0..depth).rev() {
        path[i + 1].weight += one * path[i].weight * (i + 1) as f64 / denom;
        path[i].weight = zero * path[i].weight * (depth - i) as f64 / denom;
    }
}

fn unwind(path: &mut Vec<PathElement>, index: usize) {
    let depth = path.len() - 1;
    let one = path[index].one;
    let zero = path[index].zero;
    let denom = (depth + 1) as f64;
    let mut next = path[depth].weight;

    for i in (0..depth).rev() {
        if one != 0.0 {
            let tmp = path[i].weight;
            path[i].weight = next * denom / ((i + 1) as f64 * one);
            next = tmp - path[i].weight * zero * (depth - i) as f64 / denom;
        } else {
            path[i].weight = path[i].weight * denom / (zero * (depth - i) as f64);
        }
    }

    for i in index..depth {
        path[i].feature = path[i + 1].feature;
        path[i].zero = path[i + 1].zero;
        path[i].one = path[i + 1].one;
    }
    path.pop();
}

/// Total permutation weight of the path with element `index` removed
fn unwound_sum(path: &[PathElement], index: usize) -> f64 {
    let depth = path.len() - 1;
    let one = path[index].one;
    let zero = path[index].zero;
    let denom = (depth + 1) as f64;
    let mut next = path[depth].weight;
    let mut total = 0.0;

    for i in (0..depth).rev() {
        if one != 0.0 {
            let tmp = next * denom / ((i + 1) as f64 * one);
            total += tmp;
            next = path[i].weight - tmp * zero * (depth - i) as f64 / denom;
        } else if zero != 0.0 {
            total += path[i].weight / zero / ((depth - i) as f64 / denom);
        }
    }
    total
}
