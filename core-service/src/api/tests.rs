use super::*;
use crate::logic::config::ServiceConfig;
use crate::logic::context::{Assessment, InferenceContext};
use crate::logic::model::{fixtures, ChurnLabel, PredictionResult};
use crate::logic::record::samples;
use crate::logic::session::SessionHistory;

fn high_risk_assessment() -> Assessment {
    let ctx = InferenceContext::from_model(fixtures::trees(), ServiceConfig::default());
    ctx.assess(&samples::high_risk()).unwrap()
}

#[test]
fn test_layout_parse() {
    assert_eq!("single".parse::<Layout>().unwrap(), Layout::Single);
    assert_eq!("two-column".parse::<Layout>().unwrap(), Layout::TwoColumn);
    assert_eq!(" Two_Column ".parse::<Layout>().unwrap(), Layout::TwoColumn);
    assert!("grid".parse::<Layout>().is_err());
    assert_eq!(Layout::default(), Layout::Single);
    assert_eq!(Layout::TwoColumn.to_string(), "two_column");
}

#[test]
fn test_view_from_assessment() {
    let view = AssessmentView::new(&high_risk_assessment(), 10);
    assert_eq!(view.label, "Churn");
    assert!(view.churn);
    assert_eq!(view.probability_display, "81.76%");

    let explanation = view.explanation.unwrap();
    assert_eq!(explanation.top.len(), 10);
    assert_eq!(explanation.other_count, 35);
    assert_eq!(explanation.other_label.as_deref(), Some("35 other features"));
    assert_eq!(explanation.top[0].feature, "tenure");
    assert_eq!(explanation.top[0].direction, Direction::RaisesRisk);
    assert!((explanation.baseline + 0.435).abs() < 1e-12);
}

#[test]
fn test_view_top_k_covers_everything() {
    let view = AssessmentView::new(&high_risk_assessment(), 45);
    let explanation = view.explanation.unwrap();
    assert_eq!(explanation.other_count, 0);
    assert_eq!(explanation.other_label, None);
}

#[test]
fn test_view_without_explanation() {
    let assessment = Assessment {
        prediction: PredictionResult {
            label: ChurnLabel::NotChurn,
            probability: 0.1234,
            margin: -1.96,
            threshold: 0.5,
            inference_time_us: 5,
        },
        attribution: None,
        explanation_note: Some("logistic artifact has no background expectation".to_string()),
    };
    let view = AssessmentView::new(&assessment, 10);
    assert_eq!(view.label, "Not Churn");
    assert_eq!(view.probability_display, "12.34%");
    assert!(view.explanation.is_none());

    let text = render_assessment(&view, Layout::Single);
    assert!(text.contains("Not Churn (NOT CHURN)"));
    assert!(text.contains("Explanation unavailable: logistic artifact"));

    let json = serde_json::to_value(&view).unwrap();
    assert!(json.get("explanation").is_none());
    assert!(json.get("history").is_none());
}

#[test]
fn test_render_assessment() {
    let mut history = SessionHistory::new();
    let assessment = high_risk_assessment();
    history.record(&assessment.prediction);

    let view = AssessmentView::new(&assessment, 3).with_history(&history);
    let text = render_assessment(&view, Layout::Single);

    assert!(text.contains("Churn probability: 81.76%"));
    assert!(text.contains("+0.9025  tenure = -1.276"));
    assert!(text.contains("contract_Month-to-month = 1"));
    assert!(text.contains("42 other features"));
    assert!(text.contains("Model output:      +1.5000"));
    assert!(text.contains("Session history:   81.76%"));
}

#[test]
fn test_render_assessment_two_column() {
    let view = AssessmentView::new(&high_risk_assessment(), 3);
    let text = render_assessment(&view, Layout::TwoColumn);
    let first = text.lines().next().unwrap();
    assert!(first.starts_with("Prediction:        Churn (CHURN)"));
    assert!(first.ends_with("Top contributions (log-odds, baseline -0.4350):"));
    // 3 contributions + remainder + model output on the right
    assert_eq!(text.lines().count(), 6);
}

#[test]
fn test_render_form_layouts() {
    let single = render_form(&FormDescriptor::new(Layout::Single));
    assert_eq!(single.lines().count(), 19);
    assert!(single.contains("Tenure (months): 0..72 [default 12]"));
    assert!(single.contains("Senior Citizen: 0 | 1 [default 0]"));

    let two = render_form(&FormDescriptor::new(Layout::TwoColumn));
    let first = two.lines().next().unwrap();
    assert!(first.starts_with("[Customer & Account]"));
    assert!(first.ends_with("[Services]"));
    assert_eq!(two.lines().count(), 11);
}
