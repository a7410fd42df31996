//! Customer Record - the statically shaped input row
//!
//! A `CustomerRecord` can only be built from a raw form submission through
//! [`CustomerRecord::from_raw`], which checks presence and domain of every
//! column once, centrally. Downstream code never sees a partial record.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::domain::{
    Contract, Gender, InternetAddon, InternetService, MultipleLines, PaymentMethod, YesNo,
    TENURE_MAX, TENURE_MIN,
};
use super::layout::{column_index, RECORD_LAYOUT};
use crate::logic::error::{ChurnError, ChurnResult};

/// Raw form submission: column name → JSON value
pub type RawRecord = Map<String, Value>;

// ============================================================================
// COLUMN VALUE
// ============================================================================

/// One cell of the input table
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnValue {
    Category(&'static str),
    Flag(u8),
    Integer(i64),
    Real(f64),
}

impl ColumnValue {
    /// Numeric view (categorical text has none)
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            ColumnValue::Category(_) => None,
            ColumnValue::Flag(v) => Some(v as f64),
            ColumnValue::Integer(v) => Some(v as f64),
            ColumnValue::Real(v) => Some(v),
        }
    }

    /// Category label view (continuous numbers have none)
    pub fn as_label(&self) -> Option<&'static str> {
        match *self {
            ColumnValue::Category(label) => Some(label),
            ColumnValue::Flag(0) => Some("0"),
            ColumnValue::Flag(_) => Some("1"),
            ColumnValue::Integer(_) | ColumnValue::Real(_) => None,
        }
    }
}

// ============================================================================
// CUSTOMER RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub gender: Gender,
    pub senior_citizen: bool,
    pub partner: YesNo,
    pub dependents: YesNo,
    pub tenure: u8,
    pub phone_service: YesNo,
    pub multiple_lines: MultipleLines,
    pub internet_service: InternetService,
    pub online_security: InternetAddon,
    pub online_backup: InternetAddon,
    pub device_protection: InternetAddon,
    pub tech_support: InternetAddon,
    pub streaming_tv: InternetAddon,
    pub streaming_movies: InternetAddon,
    pub contract: Contract,
    pub paperless_billing: YesNo,
    pub payment_method: PaymentMethod,
    pub monthly_charges: f64,
    pub total_charges: f64,
}

impl CustomerRecord {
    /// Validate a raw form submission.
    ///
    /// Columns are checked in layout order and the first offending one is
    /// reported. Keys outside the layout are rejected. No cross-field rule is
    /// applied: `totalcharges` is not compared with `monthlycharges * tenure`.
    pub fn from_raw(raw: &RawRecord) -> ChurnResult<Self> {
        let record = Self {
            gender: categorical(raw, "gender", Gender::parse, Gender::labels)?,
            senior_citizen: flag(raw, "seniorcitizen")?,
            partner: categorical(raw, "partner", YesNo::parse, YesNo::labels)?,
            dependents: categorical(raw, "dependents", YesNo::parse, YesNo::labels)?,
            tenure: tenure(raw, "tenure")?,
            phone_service: categorical(raw, "phoneservice", YesNo::parse, YesNo::labels)?,
            multiple_lines: categorical(
                raw,
                "multiplelines",
                MultipleLines::parse,
                MultipleLines::labels,
            )?,
            internet_service: categorical(
                raw,
                "internetservice",
                InternetService::parse,
                InternetService::labels,
            )?,
            online_security: addon(raw, "onlinesecurity")?,
            online_backup: addon(raw, "onlinebackup")?,
            device_protection: addon(raw, "deviceprotection")?,
            tech_support: addon(raw, "techsupport")?,
            streaming_tv: addon(raw, "streamingtv")?,
            streaming_movies: addon(raw, "streamingmovies")?,
            contract: categorical(raw, "contract", Contract::parse, Contract::labels)?,
            paperless_billing: categorical(raw, "paperlessbilling", YesNo::parse, YesNo::labels)?,
            payment_method: categorical(
                raw,
                "paymentmethod",
                PaymentMethod::parse,
                PaymentMethod::labels,
            )?,
            monthly_charges: non_negative(raw, "monthlycharges")?,
            total_charges: non_negative(raw, "totalcharges")?,
        };

        if let Some(unknown) = raw.keys().find(|key| column_index(key).is_none()) {
            return Err(ChurnError::invalid(unknown.as_str(), "unknown field"));
        }

        Ok(record)
    }

    /// Parse and validate a JSON object
    pub fn from_json(json: &str) -> ChurnResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ChurnError::invalid("record", format!("malformed JSON: {}", e)))?;
        match value {
            Value::Object(raw) => Self::from_raw(&raw),
            _ => Err(ChurnError::invalid("record", "expected a JSON object")),
        }
    }

    /// Cell value by column name
    pub fn value(&self, column: &str) -> Option<ColumnValue> {
        column_index(column).map(|i| self.value_at(i))
    }

    /// Cell value by layout index
    ///
    /// # Panics
    /// If `index >= COLUMN_COUNT`.
    pub fn value_at(&self, index: usize) -> ColumnValue {
        use ColumnValue::*;
        match index {
            0 => Category(self.gender.as_str()),
            1 => Flag(self.senior_citizen as u8),
            2 => Category(self.partner.as_str()),
            3 => Category(self.dependents.as_str()),
            4 => Integer(self.tenure as i64),
            5 => Category(self.phone_service.as_str()),
            6 => Category(self.multiple_lines.as_str()),
            7 => Category(self.internet_service.as_str()),
            8 => Category(self.online_security.as_str()),
            9 => Category(self.online_backup.as_str()),
            10 => Category(self.device_protection.as_str()),
            11 => Category(self.tech_support.as_str()),
            12 => Category(self.streaming_tv.as_str()),
            13 => Category(self.streaming_movies.as_str()),
            14 => Category(self.contract.as_str()),
            15 => Category(self.paperless_billing.as_str()),
            16 => Category(self.payment_method.as_str()),
            17 => Real(self.monthly_charges),
            18 => Real(self.total_charges),
            _ => panic!("column index {} out of layout", index),
        }
    }

    /// Wire form of the record, keyed by column name
    pub fn to_raw(&self) -> RawRecord {
        let mut raw = Map::new();
        for (i, name) in RECORD_LAYOUT.iter().enumerate() {
            let value = match self.value_at(i) {
                ColumnValue::Category(label) => Value::from(label),
                ColumnValue::Flag(v) => Value::from(v),
                ColumnValue::Integer(v) => Value::from(v),
                ColumnValue::Real(v) => Value::from(v),
            };
            raw.insert(name.to_string(), value);
        }
        raw
    }
}

impl Serialize for CustomerRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_raw().serialize(serializer)
    }
}

// ============================================================================
// FIELD PARSERS
// ============================================================================

fn field<'a>(raw: &'a RawRecord, name: &str) -> ChurnResult<&'a Value> {
    match raw.get(name) {
        None | Some(Value::Null) => Err(ChurnError::invalid(name, "missing")),
        Some(value) => Ok(value),
    }
}

fn categorical<T>(
    raw: &RawRecord,
    name: &str,
    parse: fn(&str) -> Option<T>,
    labels: fn() -> Vec<&'static str>,
) -> ChurnResult<T> {
    let label = match field(raw, name)? {
        Value::String(s) => s.as_str(),
        other => {
            return Err(ChurnError::invalid(
                name,
                format!("expected text, got {}", other),
            ))
        }
    };

    parse(label).ok_or_else(|| {
        ChurnError::invalid(
            name,
            format!("'{}' is not one of {:?}", label, labels()),
        )
    })
}

fn addon(raw: &RawRecord, name: &str) -> ChurnResult<InternetAddon> {
    categorical(raw, name, InternetAddon::parse, InternetAddon::labels)
}

fn flag(raw: &RawRecord, name: &str) -> ChurnResult<bool> {
    let value = field(raw, name)?;

    // Integral floats count, as they do for tenure
    match number(value) {
        Some(n) if n == 0.0 => Ok(false),
        Some(n) if n == 1.0 => Ok(true),
        _ => Err(ChurnError::invalid(name, format!("{} is not 0 or 1", value))),
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn tenure(raw: &RawRecord, name: &str) -> ChurnResult<u8> {
    let value = field(raw, name)?;
    let months = number(value)
        .ok_or_else(|| ChurnError::invalid(name, format!("{} is not a number", value)))?;

    if !months.is_finite() || months.fract() != 0.0 {
        return Err(ChurnError::invalid(name, format!("{} is not a whole number of months", value)));
    }
    if months < TENURE_MIN as f64 || months > TENURE_MAX as f64 {
        return Err(ChurnError::invalid(
            name,
            format!("{} is outside {}..={}", months, TENURE_MIN, TENURE_MAX),
        ));
    }

    Ok(months as u8)
}

fn non_negative(raw: &RawRecord, name: &str) -> ChurnResult<f64> {
    let value = field(raw, name)?;
    let amount = number(value)
        .ok_or_else(|| ChurnError::invalid(name, format!("{} is not a number", value)))?;

    if !amount.is_finite() {
        return Err(ChurnError::invalid(name, "must be finite"));
    }
    if amount < 0.0 {
        return Err(ChurnError::invalid(name, format!("{} is negative", amount)));
    }

    Ok(amount)
}
