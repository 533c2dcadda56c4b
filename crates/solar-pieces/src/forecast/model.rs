//! Pre-trained regression models
//!
//! Models are stored as JSON documents tagged by `kind`:
//!
//! ```json
//! { "kind": "linear", "feature_names": ["GHI", "TEMP"],
//!   "intercept": 0.2, "coefficients": [0.004, -0.01] }
//! ```
//!
//! ```json
//! { "kind": "tree_ensemble", "feature_names": ["GHI"], "base_score": 0.5,
//!   "trees": [{ "nodeid": 0, "split": "GHI", "split_condition": 100.0,
//!               "yes": 1, "no": 2, "missing": 1,
//!               "children": [{ "nodeid": 1, "leaf": -0.4 },
//!                            { "nodeid": 2, "leaf": 1.2 }] }] }
//! ```
//!
//! Tree nodes follow the JSON dump layout of gradient boosting libraries, so
//! a booster dumped with feature names loads unchanged.

use ndarray::{Array1, Array2, ArrayView1};
use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};

/// A fitted model mapping one feature row to one predicted value
pub trait Regressor {
    /// Feature names the model was trained on, empty when unknown
    fn feature_names(&self) -> &[String];

    /// Check the model can score rows laid out as `columns`
    fn expects_features(&self, columns: &[String]) -> std::result::Result<(), String>;

    /// Predict a single row
    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64;

    /// Predict every row of `x`, preserving row order
    fn predict(&self, x: &Array2<f64>) -> Vec<f64> {
        x.rows().into_iter().map(|row| self.predict_row(row)).collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ModelDocument {
    Linear {
        #[serde(default)]
        feature_names: Vec<String>,
        intercept: f64,
        coefficients: Vec<f64>,
    },
    TreeEnsemble {
        #[serde(default)]
        feature_names: Vec<String>,
        #[serde(default = "default_base_score")]
        base_score: f64,
        trees: Vec<TreeNodeDocument>,
    },
}

fn default_base_score() -> f64 {
    0.5
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TreeNodeDocument {
    Split {
        nodeid: u32,
        split: String,
        split_condition: f64,
        yes: u32,
        no: u32,
        #[serde(default)]
        missing: Option<u32>,
        children: Vec<TreeNodeDocument>,
    },
    Leaf {
        nodeid: u32,
        leaf: f64,
    },
}

impl TreeNodeDocument {
    fn nodeid(&self) -> u32 {
        match self {
            Self::Split { nodeid, .. } | Self::Leaf { nodeid, .. } => *nodeid,
        }
    }
}

/// Load a model document from disk
pub fn load_model(path: &Path) -> Result<Box<dyn Regressor>> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|e| Error::model_load(&display, e.to_string()))?;
    let document: ModelDocument =
        serde_json::from_str(&raw).map_err(|e| Error::model_load(&display, e.to_string()))?;

    let model: Box<dyn Regressor> = match document {
        ModelDocument::Linear {
            feature_names,
            intercept,
            coefficients,
        } => Box::new(
            LinearModel::new(feature_names, intercept, coefficients)
                .map_err(|e| Error::model_load(&display, e))?,
        ),
        ModelDocument::TreeEnsemble {
            feature_names,
            base_score,
            trees,
        } => Box::new(
            TreeEnsemble::compile(feature_names, base_score, &trees)
                .map_err(|e| Error::model_load(&display, e))?,
        ),
    };

    Ok(model)
}

fn check_names(model: &[String], columns: &[String]) -> std::result::Result<(), String> {
    if !model.is_empty() && model != columns {
        return Err(format!(
            "model expects [{}], configured [{}]",
            model.join(", "),
            columns.join(", ")
        ));
    }
    Ok(())
}

/// Ordinary linear regression: `intercept + coefficients · x`
#[derive(Debug, Clone)]
pub struct LinearModel {
    feature_names: Vec<String>,
    intercept: f64,
    coefficients: Array1<f64>,
}

impl LinearModel {
    pub fn new(
        feature_names: Vec<String>,
        intercept: f64,
        coefficients: Vec<f64>,
    ) -> std::result::Result<Self, String> {
        if !feature_names.is_empty() && feature_names.len() != coefficients.len() {
            return Err(format!(
                "{} feature names but {} coefficients",
                feature_names.len(),
                coefficients.len()
            ));
        }
        Ok(Self {
            feature_names,
            intercept,
            coefficients: Array1::from(coefficients),
        })
    }
}

impl Regressor for LinearModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn expects_features(&self, columns: &[String]) -> std::result::Result<(), String> {
        check_names(&self.feature_names, columns)?;
        if self.coefficients.len() != columns.len() {
            return Err(format!(
                "model has {} coefficients, {} feature columns configured",
                self.coefficients.len(),
                columns.len()
            ));
        }
        Ok(())
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.intercept + row.dot(&self.coefficients)
    }
}

/// Compiled decision tree node
#[derive(Debug, Clone)]
enum DecisionNode {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        yes: Box<DecisionNode>,
        no: Box<DecisionNode>,
        missing_goes_yes: bool,
    },
}

impl DecisionNode {
    fn evaluate(&self, row: &ArrayView1<'_, f64>) -> f64 {
        let mut node = self;
        loop {
            match node {
                DecisionNode::Leaf(value) => return *value,
                DecisionNode::Split {
                    feature,
                    threshold,
                    yes,
                    no,
                    missing_goes_yes,
                } => {
                    let x = row[*feature];
                    let go_yes = if x.is_nan() {
                        *missing_goes_yes
                    } else {
                        x < *threshold
                    };
                    node = if go_yes { yes.as_ref() } else { no.as_ref() };
                }
            }
        }
    }
}

/// Additive ensemble of regression trees
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    feature_names: Vec<String>,
    base_score: f64,
    trees: Vec<DecisionNode>,
    /// Highest feature index any split reads
    max_feature: Option<usize>,
}

impl TreeEnsemble {
    fn compile(
        feature_names: Vec<String>,
        base_score: f64,
        trees: &[TreeNodeDocument],
    ) -> std::result::Result<Self, String> {
        let mut max_feature = None;
        let compiled = trees
            .iter()
            .enumerate()
            .map(|(i, tree)| {
                compile_node(tree, &feature_names, &mut max_feature)
                    .map_err(|e| format!("tree {}: {}", i, e))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            feature_names,
            base_score,
            trees: compiled,
            max_feature,
        })
    }
}

fn resolve_feature(split: &str, names: &[String]) -> Option<usize> {
    if let Some(index) = names.iter().position(|n| n == split) {
        return Some(index);
    }
    let index = split.strip_prefix('f')?.parse::<usize>().ok()?;
    if names.is_empty() || index < names.len() {
        Some(index)
    } else {
        None
    }
}

fn compile_node(
    node: &TreeNodeDocument,
    names: &[String],
    max_feature: &mut Option<usize>,
) -> std::result::Result<DecisionNode, String> {
    match node {
        TreeNodeDocument::Leaf { leaf, .. } => Ok(DecisionNode::Leaf(*leaf)),
        TreeNodeDocument::Split {
            nodeid,
            split,
            split_condition,
            yes,
            no,
            missing,
            children,
        } => {
            let feature = resolve_feature(split, names)
                .ok_or_else(|| format!("node {} splits on unknown feature '{}'", nodeid, split))?;
            *max_feature = Some(max_feature.map_or(feature, |m| m.max(feature)));

            let child = |id: u32| {
                children
                    .iter()
                    .find(|c| c.nodeid() == id)
                    .ok_or_else(|| format!("node {} references missing child {}", nodeid, id))
            };
            let missing = missing.unwrap_or(*yes);
            if missing != *yes && missing != *no {
                return Err(format!(
                    "node {} routes missing values to {}, which is not a child",
                    nodeid, missing
                ));
            }

            Ok(DecisionNode::Split {
                feature,
                threshold: *split_condition,
                yes: Box::new(compile_node(child(*yes)?, names, max_feature)?),
                no: Box::new(compile_node(child(*no)?, names, max_feature)?),
                missing_goes_yes: missing == *yes,
            })
        }
    }
}

impl Regressor for TreeEnsemble {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn expects_features(&self, columns: &[String]) -> std::result::Result<(), String> {
        check_names(&self.feature_names, columns)?;
        if let Some(max) = self.max_feature {
            if max >= columns.len() {
                return Err(format!(
                    "model reads feature index {}, only {} feature columns configured",
                    max,
                    columns.len()
                ));
            }
        }
        Ok(())
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.base_score
            + self
                .trees
                .iter()
                .map(|tree| tree.evaluate(&row))
                .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn write_model(dir: &Path, json: &str) -> std::path::PathBuf {
        let path = dir.join("model.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    const TREE_MODEL: &str = r#"{
        "kind": "tree_ensemble",
        "feature_names": ["GHI", "TEMP"],
        "base_score": 0.5,
        "trees": [
            {"nodeid": 0, "depth": 0, "split": "GHI", "split_condition": 100.0,
             "yes": 1, "no": 2, "missing": 2,
             "children": [
                {"nodeid": 1, "leaf": -0.5},
                {"nodeid": 2, "depth": 1, "split": "f1", "split_condition": 30.0,
                 "yes": 3, "no": 4, "missing": 3,
                 "children": [
                    {"nodeid": 3, "leaf": 2.0},
                    {"nodeid": 4, "leaf": 1.0}
                 ]}
             ]},
            {"nodeid": 0, "leaf": 0.25}
        ]
    }"#;

    #[test]
    fn test_linear_predict() {
        let model = LinearModel::new(names(&["a", "b"]), 1.0, vec![2.0, -1.0]).unwrap();
        let x = array![[1.0, 1.0], [3.0, 2.0], [0.0, 0.0]];
        assert_eq!(model.predict(&x), vec![2.0, 5.0, 1.0]);
    }

    #[test]
    fn test_linear_arity_checks() {
        assert!(LinearModel::new(names(&["a"]), 0.0, vec![1.0, 2.0]).is_err());

        let model = LinearModel::new(Vec::new(), 0.0, vec![1.0, 2.0]).unwrap();
        assert!(model.expects_features(&names(&["x", "y"])).is_ok());
        assert!(model.expects_features(&names(&["x", "y", "z"])).is_err());

        let named = LinearModel::new(names(&["a", "b"]), 0.0, vec![1.0, 2.0]).unwrap();
        assert!(named.expects_features(&names(&["b", "a"])).is_err());
    }

    #[test]
    fn test_tree_ensemble_routing() {
        let dir = tempfile::tempdir().unwrap();
        let model = load_model(&write_model(dir.path(), TREE_MODEL)).unwrap();
        assert_eq!(model.feature_names(), names(&["GHI", "TEMP"]).as_slice());
        assert!(model.expects_features(&names(&["GHI", "TEMP"])).is_ok());

        let x = array![
            [50.0, 10.0],       // yes -> -0.5
            [500.0, 20.0],      // no -> TEMP < 30 -> 2.0
            [500.0, 35.0],      // no -> 1.0
            [f64::NAN, 40.0],   // missing -> no -> 1.0
            [500.0, f64::NAN],  // no -> missing -> 2.0
        ];
        let predictions = model.predict(&x);
        let expected = [0.25, 2.75, 1.75, 1.75, 2.75];
        for (p, e) in predictions.iter().zip(expected) {
            assert!((p - e).abs() < 1e-12, "{p} != {e}");
        }
    }

    #[test]
    fn test_tree_with_index_features_checks_width() {
        let json = r#"{"kind": "tree_ensemble", "base_score": 0.0, "trees": [
            {"nodeid": 0, "split": "f3", "split_condition": 1.0, "yes": 1, "no": 2,
             "children": [{"nodeid": 1, "leaf": 1.0}, {"nodeid": 2, "leaf": 2.0}]}
        ]}"#;
        let dir = tempfile::tempdir().unwrap();
        let model = load_model(&write_model(dir.path(), json)).unwrap();
        assert!(model.expects_features(&names(&["a", "b", "c", "d"])).is_ok());
        assert!(model.expects_features(&names(&["a", "b"])).is_err());
    }

    #[test]
    fn test_unknown_split_feature() {
        let json = r#"{"kind": "tree_ensemble", "feature_names": ["GHI"], "trees": [
            {"nodeid": 0, "split": "WIND", "split_condition": 1.0, "yes": 1, "no": 2,
             "children": [{"nodeid": 1, "leaf": 1.0}, {"nodeid": 2, "leaf": 2.0}]}
        ]}"#;
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(&write_model(dir.path(), json)).err().unwrap();
        assert!(matches!(err, Error::ModelLoad { .. }));
        assert!(err.to_string().contains("WIND"));
    }

    #[test]
    fn test_dangling_child() {
        let json = r#"{"kind": "tree_ensemble", "trees": [
            {"nodeid": 0, "split": "f0", "split_condition": 1.0, "yes": 1, "no": 7,
             "children": [{"nodeid": 1, "leaf": 1.0}]}
        ]}"#;
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(&write_model(dir.path(), json)).err().unwrap();
        assert!(err.to_string().contains("missing child 7"));
    }

    #[test]
    fn test_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(&dir.path().join("absent.json")).err().unwrap();
        assert!(matches!(err, Error::ModelLoad { .. }));

        let corrupt = write_model(dir.path(), "\u{80}not json");
        let err = load_model(&corrupt).err().unwrap();
        assert!(matches!(err, Error::ModelLoad { .. }));

        let unknown_kind = write_model(dir.path(), r#"{"kind": "svm"}"#);
        assert!(load_model(&unknown_kind).is_err());
    }
}
