use ndarray::ArrayView1;
use serde_json::Value;

use super::*;
use crate::constants::{DEFAULT_RECONCILE_EPSILON, DEFAULT_TOP_K};
use crate::logic::error::ChurnError;
use crate::logic::model::classifier::{Classifier, Tree, TreeNode};
use crate::logic::model::{fixtures, load_model_from_bytes};
use crate::logic::record::samples;

fn contribution(name: &str, contribution: f64) -> FeatureContribution {
    FeatureContribution {
        name: name.to_string(),
        value: 0.0,
        contribution,
    }
}

fn by_name<'a>(result: &'a AttributionResult, name: &str) -> &'a FeatureContribution {
    result
        .contributions
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("no contribution for {}", name))
}

/// E[f(x) | x_S] with absent features averaged over node covers
fn conditional(tree: &Tree, node: usize, row: ArrayView1<'_, f64>, known: &[usize]) -> f64 {
    match &tree.nodes[node] {
        TreeNode::Leaf { value, .. } => *value,
        TreeNode::Split { feature, threshold, left, right, cover } => {
            if known.contains(feature) {
                let next = if row[*feature] <= *threshold { *left } else { *right };
                conditional(tree, next, row, known)
            } else {
                let l = tree.nodes[*left].cover().unwrap();
                let r = tree.nodes[*right].cover().unwrap();
                (l * conditional(tree, *left, row, known) + r * conditional(tree, *right, row, known))
                    / cover.unwrap()
            }
        }
    }
}

fn factorial(n: usize) -> f64 {
    (1..=n).map(|i| i as f64).product()
}

/// Shapley values by enumerating every coalition of `players`
fn brute_force_shapley(trees: &[Tree], row: ArrayView1<'_, f64>, players: &[usize]) -> Vec<f64> {
    let m = players.len();
    let value = |known: &[usize]| -> f64 { trees.iter().map(|t| conditional(t, 0, row, known)).sum() };

    players
        .iter()
        .map(|&player| {
            let others: Vec<usize> = players.iter().copied().filter(|p| *p != player).collect();
            let mut phi = 0.0;
            for mask in 0..(1usize << others.len()) {
                let mut coalition: Vec<usize> = others
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1usize << *bit) != 0)
                    .map(|(_, f)| *f)
                    .collect();
                let size = coalition.len();
                let weight = factorial(size) * factorial(m - size - 1) / factorial(m);
                let without = value(&coalition);
                coalition.push(player);
                phi += weight * (value(&coalition) - without);
            }
            phi
        })
        .collect()
}

// ============================================================================
// RANKING
// ============================================================================

#[test]
fn test_rank_by_magnitude() {
    let ranked = rank(vec![
        contribution("tenure", 0.1),
        contribution("contract_Month-to-month", -0.8),
        contribution("monthlycharges", 0.3),
    ]);
    let names: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["contract_Month-to-month", "monthlycharges", "tenure"]);
}

#[test]
fn test_rank_ties_keep_feature_order() {
    let ranked = rank(vec![
        contribution("a", 0.5),
        contribution("b", 1.0),
        contribution("c", -0.5),
        contribution("d", 0.5),
    ]);
    let names: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["b", "a", "c", "d"]);
}

#[test]
fn test_top_k_aggregates_remainder() {
    let model = fixtures::logistic();
    let explainer = make_explainer(model.pipeline.classifier()).unwrap();
    let x = model.pipeline.transform(&[samples::high_risk()]).unwrap();
    let result = explainer.explain_row(x.row(0), model.pipeline.feature_names());

    assert_eq!(result.contributions.len(), 45);
    let cut = result.top_k(DEFAULT_TOP_K);
    assert_eq!(cut.top.len(), 10);
    assert_eq!(cut.other_count, 35);
    let shown: f64 = cut.top.iter().map(|c| c.contribution).sum();
    assert!((shown + cut.other_total - result.total()).abs() < 1e-12);

    let everything = result.top_k(100);
    assert_eq!(everything.top.len(), 45);
    assert_eq!(everything.other_count, 0);
    assert_eq!(everything.other_total, 0.0);
}

// ============================================================================
// LINEAR
// ============================================================================

#[test]
fn test_linear_explainer_formula() {
    let model = fixtures::logistic();
    let Classifier::Logistic(logistic) = model.pipeline.classifier() else {
        panic!("logistic fixture");
    };
    let explainer = LinearExplainer::new(logistic).unwrap();
    assert!((explainer.baseline() + 0.617).abs() < 1e-9);

    let x = model.pipeline.transform(&[samples::high_risk()]).unwrap();
    let result = explainer.explain_row(x.row(0), model.pipeline.feature_names());
    let background = logistic.background.as_ref().unwrap();

    for (i, name) in model.pipeline.feature_names().iter().enumerate() {
        let c = by_name(&result, name);
        let expected = logistic.coefficients[i] * (x[[0, i]] - background[i]);
        assert!((c.contribution - expected).abs() < 1e-12, "{}", name);
        assert_eq!(c.value, x[[0, i]]);
    }
}

#[test]
fn test_linear_without_background_is_unavailable() {
    let mut value: Value = serde_json::from_str(fixtures::LOGISTIC_JSON).unwrap();
    value["pipeline"]["classifier"]
        .as_object_mut()
        .unwrap()
        .remove("background");
    let bytes = serde_json::to_vec(&value).unwrap();
    let model = load_model_from_bytes(&bytes, "no-background", None).unwrap();

    assert!(matches!(
        make_explainer(model.pipeline.classifier()),
        Err(ChurnError::ExplainerUnavailable(_))
    ));
}

// ============================================================================
// TREES
// ============================================================================

#[test]
fn test_tree_baseline() {
    let model = fixtures::trees();
    let explainer = make_explainer(model.pipeline.classifier()).unwrap();
    assert_eq!(explainer.name(), "tree_shap");
    assert!((explainer.baseline() + 0.435).abs() < 1e-12);
}

#[test]
fn test_tree_explainer_reference_values() {
    let model = fixtures::trees();
    let explainer = make_explainer(model.pipeline.classifier()).unwrap();
    let x = model.pipeline.transform(&[samples::high_risk()]).unwrap();
    let result = explainer.explain_row(x.row(0), model.pipeline.feature_names());

    assert!((by_name(&result, "tenure").contribution - 0.9025).abs() < 1e-9);
    assert!((by_name(&result, "contract_Month-to-month").contribution - 0.57).abs() < 1e-9);
    assert!((by_name(&result, "internetservice_Fiber optic").contribution - 0.3).abs() < 1e-9);
    assert!((by_name(&result, "paymentmethod_Electronic check").contribution - 0.1625).abs() < 1e-9);
    assert_eq!(by_name(&result, "gender_Female").contribution, 0.0);

    assert_eq!(result.contributions[0].name, "tenure");
    assert_eq!(result.contributions[1].name, "contract_Month-to-month");
    assert!((result.raw_output - 1.5).abs() < 1e-12);
}

#[test]
fn test_tree_explainer_matches_brute_force() {
    let model = fixtures::trees();
    let Classifier::GradientBoosting(ensemble) = model.pipeline.classifier() else {
        panic!("trees fixture");
    };
    let explainer = TreeExplainer::new(ensemble).unwrap();
    let players = [0, 16, 36, 43];

    let x = model.pipeline.transform(&samples::all()).unwrap();
    for row in x.rows() {
        let phi = explainer.contributions(row);
        let exact = brute_force_shapley(&ensemble.trees, row, &players);
        for (player, expected) in players.iter().zip(exact) {
            assert!((phi[*player] - expected).abs() < 1e-9, "feature {}", player);
        }
        let unused: f64 = phi
            .iter()
            .enumerate()
            .filter(|(i, _)| !players.contains(i))
            .map(|(_, v)| v.abs())
            .sum();
        assert_eq!(unused, 0.0);
    }
}

#[test]
fn test_tree_without_cover_is_unavailable() {
    let mut value: Value = serde_json::from_str(fixtures::TREES_JSON).unwrap();
    value["pipeline"]["classifier"]["trees"][1]["nodes"][2]
        .as_object_mut()
        .unwrap()
        .remove("cover");
    let bytes = serde_json::to_vec(&value).unwrap();
    let model = load_model_from_bytes(&bytes, "no-cover", None).unwrap();

    match make_explainer(model.pipeline.classifier()) {
        Err(ChurnError::ExplainerUnavailable(msg)) => assert!(msg.contains("tree 1")),
        Err(other) => panic!("unexpected error {}", other),
        Ok(_) => panic!("explainer built without covers"),
    }
}

// ============================================================================
// RECONCILIATION
// ============================================================================

#[test]
fn test_reconciles_with_pipeline_margin() {
    for model in [fixtures::logistic(), fixtures::trees()] {
        let explainer = make_explainer(model.pipeline.classifier()).unwrap();
        let table = samples::all();
        let x = model.pipeline.transform(&table).unwrap();
        let margins = model.pipeline.decision_function(&table).unwrap();
        let results = explainer.explain(x.view(), model.pipeline.feature_names());

        assert_eq!(results.len(), table.len());
        for (result, margin) in results.iter().zip(margins.iter()) {
            assert_eq!(result.output_space, OutputSpace::Margin);
            assert_eq!(result.raw_output, *margin);
            verify(result, *margin, DEFAULT_RECONCILE_EPSILON).unwrap();
            assert!(result.residual() < DEFAULT_RECONCILE_EPSILON);
        }
    }
}

#[test]
fn test_contributions_are_sorted() {
    for model in [fixtures::logistic(), fixtures::trees()] {
        let explainer = make_explainer(model.pipeline.classifier()).unwrap();
        let x = model.pipeline.transform(&samples::all()).unwrap();
        for result in explainer.explain(x.view(), model.pipeline.feature_names()) {
            for pair in result.contributions.windows(2) {
                assert!(pair[0].contribution.abs() >= pair[1].contribution.abs());
            }
        }
    }
}

#[test]
fn test_verify_reports_mismatch() {
    let result = AttributionResult {
        baseline: -0.5,
        raw_output: 1.0,
        output_space: OutputSpace::Margin,
        contributions: vec![contribution("tenure", 1.0)],
    };
    assert!(verify(&result, 0.5, 1e-6).is_ok());

    match verify(&result, 1.0, 1e-6) {
        Err(ChurnError::ExplanationMismatch { expected, reconstructed, .. }) => {
            assert_eq!(expected, 1.0);
            assert_eq!(reconstructed, 0.5);
        }
        other => panic!("expected mismatch, got {:?}", other),
    }
}
