//! Shared fixtures: a small GBDT trained on synthetic employees plus a
//! median imputer, written the way the real artifacts are laid out.
#![allow(dead_code)]

use std::path::Path;

use gbdt::config::Config;
use gbdt::decision_tree::Data;
use gbdt::gradient_boost::GBDT;

pub const NUM_FEATURES: usize = 47;
pub const AGE: usize = 0;
pub const MONTHLY_INCOME: usize = 10;
pub const OVERTIME: usize = 46;

/// Synthetic employee: overtime plus low income means they leave.
pub fn sample(i: usize) -> (Vec<f32>, f32) {
    let mut row = vec![0.0_f32; NUM_FEATURES];
    row[AGE] = 20.0 + (i % 40) as f32;
    row[MONTHLY_INCOME] = 1000.0 + ((i * 379) % 15000) as f32;
    row[OVERTIME] = (i % 2) as f32;
    let leaves = row[OVERTIME] == 1.0 && row[MONTHLY_INCOME] < 6000.0;
    (row, if leaves { 1.0 } else { -1.0 })
}

/// Write a small trained model and a median imputer into `dir`.
pub fn write_artifacts(dir: &Path) {
    let mut cfg = Config::new();
    cfg.set_feature_size(NUM_FEATURES);
    cfg.set_max_depth(3);
    cfg.set_iterations(20);
    cfg.set_shrinkage(0.3);
    cfg.set_loss("LogLikelyhood");
    cfg.set_debug(false);
    cfg.set_training_optimization_level(2);
    cfg.set_min_leaf_size(1);

    let mut data: Vec<Data> = (0..200)
        .map(|i| {
            let (row, label) = sample(i);
            Data::new_training_data(row, 1.0, label, None)
        })
        .collect();
    let mut model = GBDT::new(&cfg);
    model.fit(&mut data);

    std::fs::write(
        dir.join("xgb_model.json"),
        serde_json::to_string(&model).unwrap(),
    )
    .unwrap();

    let mut statistics = vec![0.0_f64; NUM_FEATURES];
    statistics[AGE] = 36.0;
    statistics[MONTHLY_INCOME] = 4919.0;
    let imputer = serde_json::json!({ "strategy": "median", "statistics": statistics });
    std::fs::write(dir.join("imputer.json"), imputer.to_string()).unwrap();
}

/// Write a one-stump XGBoost tree dump on `OverTime_Yes` (leaf -0.4 without
/// overtime, 0.6 with) and a zero imputer into `dir`.
pub fn write_dump_artifacts(dir: &Path) {
    let dump = serde_json::json!([{
        "nodeid": 0, "depth": 0, "split": "OverTime_Yes", "split_condition": 0.5,
        "yes": 1, "no": 2, "missing": 1,
        "children": [{"nodeid": 1, "leaf": -0.4}, {"nodeid": 2, "leaf": 0.6}]
    }]);
    std::fs::write(dir.join("xgb_model.json"), dump.to_string()).unwrap();

    let imputer = serde_json::json!({ "strategy": "median", "statistics": vec![0.0_f64; NUM_FEATURES] });
    std::fs::write(dir.join("imputer.json"), imputer.to_string()).unwrap();
}
