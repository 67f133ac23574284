//! GBDT model wrapper for attrition classification
//!
//! Wraps the `gbdt` crate to provide:
//! - Model loading from XGBoost JSON (a `save_model` document or a
//!   `dump_model(..., dump_format="json")` tree dump) or gbdt-rs native JSON
//! - Resolution of named tree splits against the canonical feature schema
//! - Single-row inference over a canonical [`FeatureVector`] row
//!
//! Every XGBoost input ends up as a nested tree dump handed to
//! `GBDT::from_xgboost_reader`. That reader wants the base margin on the
//! first line and the tree array after it; the margin is added to the tree
//! sum before the sigmoid, so it is the logit of XGBoost's `base_score`.
//!
//! XGBoost dumps produced from a DataFrame name their splits after the
//! columns (`"split": "MonthlyIncome"`). gbdt-rs wants positional indices, so
//! every split is rewritten to its index in [`FEATURE_NAMES`] before the
//! trees are built. A split naming a column outside the schema means the
//! model was fit on a different column set and is rejected.
//!
//! Note: the gbdt crate internally uses `f32` (`ValueType`), while
//! [`FeatureVector`] stores `f64`. Conversions happen at the crate boundary.
//!
//! [`FeatureVector`]: crate::schema::FeatureVector
//! [`FEATURE_NAMES`]: crate::schema::FEATURE_NAMES

use std::io::{BufReader, Cursor};

use gbdt::decision_tree::Data;
use gbdt::gradient_boost::GBDT;
use serde_json::{json, Value};

use super::RiskModel;
use crate::schema::{feature_index, FEATURE_NAMES, NUM_FEATURES};

/// XGBoost objective the attrition model was trained with.
const OBJECTIVE: &str = "binary:logistic";

/// XGBoost's default `base_score`; a tree dump does not record it.
const DEFAULT_BASE_SCORE: f64 = 0.5;

/// Convert an `f64` row to the `f32` layout gbdt expects.
#[inline]
fn row_to_f32(row: &[f64]) -> Vec<f32> {
    row.iter().map(|&v| v as f32).collect()
}

/// Margin-space offset for a probability-space `base_score`.
fn base_margin(base_score: f64) -> Result<f64, String> {
    if !(base_score > 0.0 && base_score < 1.0) {
        return Err(format!(
            "base_score {base_score} must lie strictly between 0 and 1 for {OBJECTIVE}"
        ));
    }
    Ok((base_score / (1.0 - base_score)).ln())
}

// ---------------------------------------------------------------------------
// Split resolution
// ---------------------------------------------------------------------------

/// Map a dump's `split` value to a column index.
///
/// Accepts a canonical column name, XGBoost's positional `fN`, or a bare
/// integer.
fn split_index(split: &Value) -> Result<usize, String> {
    let index = match split {
        Value::Number(n) => n
            .as_u64()
            .map(|i| i as usize)
            .ok_or_else(|| format!("invalid split index {n}"))?,
        Value::String(name) => match feature_index(name) {
            Some(i) => i,
            None => name
                .strip_prefix('f')
                .and_then(|rest| rest.parse::<usize>().ok())
                .ok_or_else(|| format!("unknown split feature '{name}'"))?,
        },
        other => return Err(format!("invalid split value {other}")),
    };
    if index >= NUM_FEATURES {
        return Err(format!(
            "split feature index {index} out of range (model must use {NUM_FEATURES} features)"
        ));
    }
    Ok(index)
}

/// Rewrite every `split` in a dumped tree to its canonical column index.
fn resolve_tree_splits(node: &mut Value) -> Result<(), String> {
    let Some(obj) = node.as_object_mut() else {
        return Err("tree node is not a JSON object".to_string());
    };
    if let Some(split) = obj.get("split") {
        let index = split_index(split)?;
        obj.insert("split".to_string(), Value::from(index as u64));
    }
    if let Some(children) = obj.get_mut("children").and_then(Value::as_array_mut) {
        for child in children.iter_mut() {
            resolve_tree_splits(child)?;
        }
    }
    Ok(())
}

/// Rewrite all trees of an XGBoost dump in place.
pub fn resolve_dump_splits(dump: &mut Value) -> Result<usize, String> {
    let trees = dump
        .as_array_mut()
        .ok_or_else(|| "XGBoost dump must be a JSON array of trees".to_string())?;
    if trees.is_empty() {
        return Err("XGBoost dump contains no trees".to_string());
    }
    for tree in trees.iter_mut() {
        resolve_tree_splits(tree)?;
    }
    Ok(trees.len())
}

// ---------------------------------------------------------------------------
// XGBoost model document (`save_model`)
// ---------------------------------------------------------------------------

/// `base_score` is stored as a string: `"5E-1"`, or `"[5E-1]"` in newer
/// releases.
fn parse_base_score(value: &Value) -> Result<f64, String> {
    match value {
        Value::Null => Ok(DEFAULT_BASE_SCORE),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("invalid base_score {n}")),
        Value::String(s) => s
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid base_score '{s}'")),
        other => Err(format!("invalid base_score {other}")),
    }
}

fn number_array<'a>(tree: &'a Value, key: &str) -> Result<&'a Vec<Value>, String> {
    tree[key]
        .as_array()
        .ok_or_else(|| format!("tree is missing '{key}'"))
}

/// One tree of a model document, as parallel per-node arrays.
struct FlatTree<'a> {
    left: &'a [Value],
    right: &'a [Value],
    split_indices: &'a [Value],
    split_conditions: &'a [Value],
    default_left: &'a [Value],
}

impl<'a> FlatTree<'a> {
    fn from_value(tree: &'a Value) -> Result<Self, String> {
        let flat = Self {
            left: number_array(tree, "left_children")?,
            right: number_array(tree, "right_children")?,
            split_indices: number_array(tree, "split_indices")?,
            split_conditions: number_array(tree, "split_conditions")?,
            default_left: number_array(tree, "default_left")?,
        };
        let n = flat.left.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            flat.right.len(),
            flat.split_indices.len(),
            flat.split_conditions.len(),
            flat.default_left.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err("tree node arrays differ in length".to_string());
        }
        Ok(flat)
    }

    fn child(&self, side: &[Value], id: usize) -> Result<Option<usize>, String> {
        match side[id].as_i64() {
            Some(-1) => Ok(None),
            Some(c) if c > 0 && (c as usize) < side.len() => Ok(Some(c as usize)),
            _ => Err(format!("node {id} has an invalid child {}", side[id])),
        }
    }

    /// Rebuild node `id` in the nested dump layout.
    fn to_dump_node(&self, id: usize, depth: usize) -> Result<Value, String> {
        if depth > self.left.len() {
            return Err("tree contains a cycle".to_string());
        }
        let condition = self.split_conditions[id]
            .as_f64()
            .ok_or_else(|| format!("node {id} has an invalid split condition"))?;

        let (yes, no) = match (self.child(self.left, id)?, self.child(self.right, id)?) {
            (None, None) => return Ok(json!({ "nodeid": id, "leaf": condition })),
            (Some(yes), Some(no)) => (yes, no),
            _ => return Err(format!("node {id} has only one child")),
        };

        let split = self.split_indices[id]
            .as_u64()
            .ok_or_else(|| format!("node {id} has an invalid split index"))?;
        let default_left = match &self.default_left[id] {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_i64() == Some(1),
            other => return Err(format!("node {id} has an invalid default_left {other}")),
        };

        Ok(json!({
            "nodeid": id,
            "split": split,
            "split_condition": condition,
            "yes": yes,
            "no": no,
            "missing": if default_left { yes } else { no },
            "children": [
                self.to_dump_node(yes, depth + 1)?,
                self.to_dump_node(no, depth + 1)?,
            ],
        }))
    }
}

/// Convert a `save_model` document to `(base_score, tree dump)`.
fn model_document_to_dump(doc: &Value) -> Result<(f64, Value), String> {
    let learner = &doc["learner"];

    if let Some(names) = learner["feature_names"].as_array().filter(|n| !n.is_empty()) {
        let matches = names.len() == NUM_FEATURES
            && names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .all(|(got, want)| got.as_str() == Some(*want));
        if !matches {
            return Err(format!(
                "model was fit on {} columns that differ from the {NUM_FEATURES}-feature schema",
                names.len()
            ));
        }
    }

    let objective = learner["objective"]["name"].as_str().unwrap_or(OBJECTIVE);
    if objective != OBJECTIVE {
        return Err(format!("unsupported objective '{objective}', expected {OBJECTIVE}"));
    }

    let base_score = parse_base_score(&learner["learner_model_param"]["base_score"])?;
    let trees = learner["gradient_booster"]["model"]["trees"]
        .as_array()
        .ok_or_else(|| "model has no learner.gradient_booster.model.trees".to_string())?;

    let dump = trees
        .iter()
        .enumerate()
        .map(|(i, tree)| {
            FlatTree::from_value(tree)
                .and_then(|flat| flat.to_dump_node(0, 0))
                .map_err(|e| format!("tree {i}: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((base_score, Value::Array(dump)))
}

// ---------------------------------------------------------------------------
// Classifier wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around `gbdt::gradient_boost::GBDT` exposing the
/// positive-class probability for one canonical row.
pub struct AttritionClassifier {
    model: GBDT,
}

impl AttritionClassifier {
    /// Load a model from JSON text, detecting the encoding from its shape.
    ///
    /// - top-level array: XGBoost tree dump (`base_score` 0.5 assumed)
    /// - object with a `learner` key: XGBoost `save_model` document
    /// - any other object: gbdt-rs native model
    pub fn from_json(json: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| format!("not valid JSON: {e}"))?;
        match value {
            Value::Array(_) => Self::from_xgboost_dump(value, DEFAULT_BASE_SCORE),
            Value::Object(ref obj) if obj.contains_key("learner") => {
                let (base_score, dump) = model_document_to_dump(&value)?;
                Self::from_xgboost_dump(dump, base_score)
            }
            Value::Object(_) => Self::from_native_value(value),
            _ => Err("expected an XGBoost model or tree dump, or a gbdt model".into()),
        }
    }

    fn from_xgboost_dump(mut dump: Value, base_score: f64) -> Result<Self, String> {
        let trees = resolve_dump_splits(&mut dump)?;
        let margin = base_margin(base_score)?;
        let text = format!("{margin}\n{dump}");
        let model = GBDT::from_xgboost_reader(BufReader::new(Cursor::new(text)), OBJECTIVE)
            .map_err(|e| format!("failed to build trees from XGBoost dump: {e}"))?;
        tracing::debug!("loaded XGBoost model with {trees} trees, base_score {base_score}");
        Ok(Self { model })
    }

    fn from_native_value(value: Value) -> Result<Self, String> {
        let model: GBDT =
            serde_json::from_value(value).map_err(|e| format!("failed to parse GBDT JSON: {e}"))?;
        Ok(Self { model })
    }

    /// Wrap an already-trained `GBDT` instance.
    pub fn from_trained(model: GBDT) -> Self {
        Self { model }
    }
}

impl RiskModel for AttritionClassifier {
    fn positive_probability(&self, row: &[f64]) -> f64 {
        let data = vec![Data::new_test_data(row_to_f32(row), None)];
        let preds = self.model.predict(&data);
        preds.first().copied().unwrap_or(0.5_f32) as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
