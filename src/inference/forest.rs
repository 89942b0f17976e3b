//! Random-forest model artifact.
//!
//! JSON layout (one object per tree node, children always after parents):
//! ```json
//! {
//!   "feature_names": ["att1", "att3"],
//!   "classes": [0, 1],
//!   "trees": [
//!     { "nodes": [
//!         { "feature": 0, "threshold": 0.25, "left": 1, "right": 2 },
//!         { "value": [8.0, 2.0] },
//!         { "value": [1.0, 9.0] }
//!     ] }
//!   ]
//! }
//! ```
//! A split sends `x[feature] <= threshold` left. Leaves hold per-class
//! weights; the forest averages the normalised weights of every tree and
//! picks the heaviest class, the first one on ties.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

use super::Classifier;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Normalised class weights of the leaf `row` lands in.
    fn leaf_distribution(&self, row: &[f64]) -> Vec<f64> {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { value } => {
                    let total: f64 = value.iter().sum();
                    return if total > 0.0 {
                        value.iter().map(|w| w / total).collect()
                    } else {
                        vec![0.0; value.len()]
                    };
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub feature_names: Vec<String>,
    pub classes: Vec<i64>,
    pub trees: Vec<Tree>,
}

impl RandomForest {
    /// Read and validate a JSON artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading model {}", path.display()))?;
        let forest: RandomForest = serde_json::from_str(&text).context("parsing model JSON")?;
        forest.validate()?;
        Ok(forest)
    }

    /// Structural checks that make traversal total: in-range feature
    /// indices, forward-pointing children, leaf widths matching `classes`.
    pub fn validate(&self) -> Result<(), InferenceError> {
        let invalid = |msg: String| Err(InferenceError::InvalidModel(msg));

        if self.classes.is_empty() {
            return invalid("no classes".into());
        }
        if self.trees.is_empty() {
            return invalid("no trees".into());
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return invalid(format!("tree {t} has no nodes"));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= self.feature_names.len() {
                            return invalid(format!("tree {t} node {i}: feature {feature} out of range"));
                        }
                        if !threshold.is_finite() {
                            return invalid(format!("tree {t} node {i}: non-finite threshold"));
                        }
                        for child in [*left, *right] {
                            if child <= i || child >= tree.nodes.len() {
                                return invalid(format!("tree {t} node {i}: bad child index {child}"));
                            }
                        }
                    }
                    Node::Leaf { value } => {
                        if value.len() != self.classes.len() {
                            return invalid(format!(
                                "tree {t} node {i}: leaf has {} weights for {} classes",
                                value.len(),
                                self.classes.len()
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, row: &[f64]) -> Result<i64, InferenceError> {
        if row.len() != self.feature_names.len() {
            return Err(InferenceError::RowShape {
                expected: self.feature_names.len(),
                found: row.len(),
            });
        }

        let mut votes = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, w) in votes.iter_mut().zip(tree.leaf_distribution(row)) {
                *acc += w;
            }
        }

        let best = votes
            .iter()
            .enumerate()
            .fold(0, |best, (i, v)| if *v > votes[best] { i } else { best });
        Ok(self.classes[best])
    }
}
