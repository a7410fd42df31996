use serde_json::json;

use super::domain::{Contract, InternetService};
use super::record::{ColumnValue, CustomerRecord, RawRecord};
use super::samples;
use crate::logic::error::ChurnError;

fn high_risk_raw() -> RawRecord {
    match json!({
        "gender": "Female",
        "seniorcitizen": 0,
        "partner": "Yes",
        "dependents": "No",
        "tenure": 1,
        "phoneservice": "Yes",
        "multiplelines": "No",
        "internetservice": "Fiber optic",
        "onlinesecurity": "No",
        "onlinebackup": "No",
        "deviceprotection": "No",
        "techsupport": "No",
        "streamingtv": "No",
        "streamingmovies": "No",
        "contract": "Month-to-month",
        "paperlessbilling": "Yes",
        "paymentmethod": "Electronic check",
        "monthlycharges": 70.0,
        "totalcharges": 70.0
    }) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn expect_invalid(raw: &RawRecord, expected_field: &str) {
    match CustomerRecord::from_raw(raw) {
        Err(ChurnError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
        other => panic!("Expected InvalidInput on {}, got {:?}", expected_field, other),
    }
}

#[test]
fn test_valid_record() {
    let record = CustomerRecord::from_raw(&high_risk_raw()).unwrap();
    assert_eq!(record, samples::high_risk());
    assert_eq!(record.contract, Contract::MonthToMonth);
    assert_eq!(record.internet_service, InternetService::FiberOptic);
}

#[test]
fn test_round_trip_through_wire_form() {
    for record in samples::all() {
        let raw = record.to_raw();
        assert_eq!(CustomerRecord::from_raw(&raw).unwrap(), record);
    }
}

#[test]
fn test_wire_form_has_every_column() {
    let raw = samples::low_risk().to_raw();
    // serde_json::Map is sorted unless preserve_order is enabled; compare as sets
    let mut expected: Vec<&str> = super::RECORD_LAYOUT.to_vec();
    let mut actual: Vec<&str> = raw.keys().map(|k| k.as_str()).collect();
    expected.sort_unstable();
    actual.sort_unstable();
    assert_eq!(actual, expected);
}

#[test]
fn test_reject_out_of_domain_contract() {
    let mut raw = high_risk_raw();
    raw.insert("contract".into(), json!("Quarterly"));
    expect_invalid(&raw, "contract");
}

#[test]
fn test_reject_missing_field() {
    let mut raw = high_risk_raw();
    raw.remove("paymentmethod");
    expect_invalid(&raw, "paymentmethod");
}

#[test]
fn test_null_counts_as_missing() {
    let mut raw = high_risk_raw();
    raw.insert("gender".into(), serde_json::Value::Null);
    expect_invalid(&raw, "gender");
}

#[test]
fn test_first_offending_column_in_layout_order() {
    let mut raw = high_risk_raw();
    raw.remove("totalcharges");
    raw.insert("partner".into(), json!("Maybe"));
    expect_invalid(&raw, "partner");
}

#[test]
fn test_case_sensitive_categories() {
    let mut raw = high_risk_raw();
    raw.insert("internetservice".into(), json!("fiber optic"));
    expect_invalid(&raw, "internetservice");
}

#[test]
fn test_reject_unknown_field() {
    let mut raw = high_risk_raw();
    raw.insert("customerid".into(), json!("7590-VHVEG"));
    expect_invalid(&raw, "customerid");
}

#[test]
fn test_tenure_bounds() {
    let mut raw = high_risk_raw();
    raw.insert("tenure".into(), json!(0));
    assert_eq!(CustomerRecord::from_raw(&raw).unwrap().tenure, 0);

    raw.insert("tenure".into(), json!(72));
    assert_eq!(CustomerRecord::from_raw(&raw).unwrap().tenure, 72);

    raw.insert("tenure".into(), json!(73));
    expect_invalid(&raw, "tenure");

    raw.insert("tenure".into(), json!(-1));
    expect_invalid(&raw, "tenure");

    raw.insert("tenure".into(), json!(12.5));
    expect_invalid(&raw, "tenure");
}

#[test]
fn test_numeric_strings_from_forms() {
    let mut raw = high_risk_raw();
    raw.insert("tenure".into(), json!("12"));
    raw.insert("seniorcitizen".into(), json!("1"));
    raw.insert("monthlycharges".into(), json!(" 89.10 "));

    let record = CustomerRecord::from_raw(&raw).unwrap();
    assert_eq!(record.tenure, 12);
    assert!(record.senior_citizen);
    assert_eq!(record.monthly_charges, 89.10);
}

#[test]
fn test_reject_negative_charges() {
    let mut raw = high_risk_raw();
    raw.insert("monthlycharges".into(), json!(-5.0));
    expect_invalid(&raw, "monthlycharges");
}

#[test]
fn test_reject_bad_senior_flag() {
    let mut raw = high_risk_raw();
    raw.insert("seniorcitizen".into(), json!(2));
    expect_invalid(&raw, "seniorcitizen");

    raw.insert("seniorcitizen".into(), json!(true));
    expect_invalid(&raw, "seniorcitizen");

    raw.insert("seniorcitizen".into(), json!(0.5));
    expect_invalid(&raw, "seniorcitizen");
}

#[test]
fn test_integral_floats_accepted_like_tenure() {
    let mut raw = high_risk_raw();
    raw.insert("seniorcitizen".into(), json!(1.0));
    raw.insert("tenure".into(), json!(12.0));
    let record = CustomerRecord::from_raw(&raw).unwrap();
    assert!(record.senior_citizen);
    assert_eq!(record.tenure, 12);

    raw.insert("seniorcitizen".into(), json!("0.0"));
    assert!(!CustomerRecord::from_raw(&raw).unwrap().senior_citizen);
}

#[test]
fn test_total_not_checked_against_monthly() {
    // Accepted looseness: no cross-field rule
    let mut raw = high_risk_raw();
    raw.insert("tenure".into(), json!(60));
    raw.insert("totalcharges".into(), json!(1.0));
    assert!(CustomerRecord::from_raw(&raw).is_ok());
}

#[test]
fn test_from_json_rejects_non_object() {
    assert!(matches!(
        CustomerRecord::from_json("[1, 2]"),
        Err(ChurnError::InvalidInput { .. })
    ));
    assert!(matches!(
        CustomerRecord::from_json("{not json"),
        Err(ChurnError::InvalidInput { .. })
    ));
}

#[test]
fn test_column_values() {
    let record = samples::no_internet();
    assert_eq!(record.value("seniorcitizen"), Some(ColumnValue::Flag(1)));
    assert_eq!(record.value("tenure").and_then(|v| v.as_number()), Some(24.0));
    assert_eq!(
        record.value("onlinesecurity").and_then(|v| v.as_label()),
        Some("No internet service")
    );
    assert_eq!(ColumnValue::Flag(1).as_label(), Some("1"));
    assert_eq!(ColumnValue::Real(1.5).as_label(), None);
    assert_eq!(record.value("unknown"), None);
}

#[test]
fn test_serialize_matches_wire_form() {
    let record = samples::high_risk();
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["contract"], "Month-to-month");
    assert_eq!(value["seniorcitizen"], 0);
    assert_eq!(value["monthlycharges"], 70.0);
}
