//! Form Descriptor - the 19 input widgets, their labels and defaults

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::Layout;
use crate::logic::record::domain::{allowed_labels, TENURE_MAX, TENURE_MIN};
use crate::logic::record::layout::RECORD_LAYOUT;
use crate::logic::record::RawRecord;

const DEFAULT_TENURE: i64 = 12;
const DEFAULT_MONTHLY_CHARGES: f64 = 70.0;
const DEFAULT_TOTAL_CHARGES: f64 = 2000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Widget {
    Select { options: Vec<Value> },
    Slider { min: i64, max: i64 },
    Number { min: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    Customer,
    Services,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub group: FieldGroup,
    pub widget: Widget,
    pub default: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDescriptor {
    pub layout: Layout,
    pub columns: Vec<FormColumn>,
}

fn label_for(column: &str) -> &'static str {
    match column {
        "gender" => "Gender",
        "seniorcitizen" => "Senior Citizen",
        "partner" => "Partner",
        "dependents" => "Dependents",
        "tenure" => "Tenure (months)",
        "phoneservice" => "Phone Service",
        "multiplelines" => "Multiple Lines",
        "internetservice" => "Internet Service",
        "onlinesecurity" => "Online Security",
        "onlinebackup" => "Online Backup",
        "deviceprotection" => "Device Protection",
        "techsupport" => "Tech Support",
        "streamingtv" => "Streaming TV",
        "streamingmovies" => "Streaming Movies",
        "contract" => "Contract",
        "paperlessbilling" => "Paperless Billing",
        "paymentmethod" => "Payment Method",
        "monthlycharges" => "Monthly Charges",
        "totalcharges" => "Total Charges",
        _ => "",
    }
}

fn group_for(column: &str) -> FieldGroup {
    match column {
        "phoneservice" | "multiplelines" | "internetservice" | "onlinesecurity"
        | "onlinebackup" | "deviceprotection" | "techsupport" | "streamingtv"
        | "streamingmovies" => FieldGroup::Services,
        _ => FieldGroup::Customer,
    }
}

fn field_for(column: &str) -> FormField {
    let (widget, default) = match column {
        "tenure" => (
            Widget::Slider { min: TENURE_MIN, max: TENURE_MAX },
            json!(DEFAULT_TENURE),
        ),
        "monthlycharges" => (Widget::Number { min: 0.0 }, json!(DEFAULT_MONTHLY_CHARGES)),
        "totalcharges" => (Widget::Number { min: 0.0 }, json!(DEFAULT_TOTAL_CHARGES)),
        // Flag options are numbers, like the value the record expects
        "seniorcitizen" => (Widget::Select { options: vec![json!(0), json!(1)] }, json!(0)),
        _ => {
            let options: Vec<Value> = allowed_labels(column)
                .unwrap_or_default()
                .into_iter()
                .map(Value::from)
                .collect();
            let default = options.first().cloned().unwrap_or(Value::Null);
            (Widget::Select { options }, default)
        }
    };

    FormField {
        name: column.to_string(),
        label: label_for(column).to_string(),
        group: group_for(column),
        widget,
        default,
    }
}

impl FormDescriptor {
    pub fn new(layout: Layout) -> Self {
        let fields: Vec<FormField> = RECORD_LAYOUT.iter().map(|c| field_for(c)).collect();

        let columns = match layout {
            Layout::Single => vec![FormColumn { title: None, fields }],
            Layout::TwoColumn => {
                let (customer, services): (Vec<FormField>, Vec<FormField>) = fields
                    .into_iter()
                    .partition(|f| f.group == FieldGroup::Customer);
                vec![
                    FormColumn {
                        title: Some("Customer & Account".to_string()),
                        fields: customer,
                    },
                    FormColumn {
                        title: Some("Services".to_string()),
                        fields: services,
                    },
                ]
            }
        };

        Self { layout, columns }
    }

    pub fn fields(&self) -> impl Iterator<Item = &FormField> {
        self.columns.iter().flat_map(|c| c.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields().find(|f| f.name == name)
    }

    /// Raw record holding every default, as an untouched form would submit it
    pub fn default_record(&self) -> RawRecord {
        self.fields()
            .map(|f| (f.name.clone(), f.default.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::record::CustomerRecord;

    #[test]
    fn test_single_layout_keeps_record_order() {
        let form = FormDescriptor::new(Layout::Single);
        assert_eq!(form.columns.len(), 1);
        let names: Vec<&str> = form.fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, RECORD_LAYOUT);
    }

    #[test]
    fn test_two_column_layout_splits_services() {
        let form = FormDescriptor::new(Layout::TwoColumn);
        assert_eq!(form.columns.len(), 2);
        assert_eq!(form.columns[0].fields.len(), 10);
        assert_eq!(form.columns[1].fields.len(), 9);
        assert!(form.columns[1].fields.iter().all(|f| f.group == FieldGroup::Services));
        assert_eq!(form.fields().count(), 19);
    }

    #[test]
    fn test_widgets_and_defaults() {
        let form = FormDescriptor::new(Layout::Single);

        let tenure = form.field("tenure").unwrap();
        assert_eq!(tenure.label, "Tenure (months)");
        assert_eq!(tenure.widget, Widget::Slider { min: 0, max: 72 });
        assert_eq!(tenure.default, json!(12));

        assert_eq!(form.field("monthlycharges").unwrap().default, json!(70.0));
        assert_eq!(form.field("totalcharges").unwrap().default, json!(2000.0));
        assert_eq!(form.field("gender").unwrap().default, json!("Male"));
        assert_eq!(form.field("partner").unwrap().default, json!("Yes"));
        assert_eq!(form.field("seniorcitizen").unwrap().default, json!(0));

        match &form.field("paymentmethod").unwrap().widget {
            Widget::Select { options } => {
                assert_eq!(options.len(), 4);
                assert_eq!(options[0], json!("Electronic check"));
            }
            other => panic!("unexpected widget {:?}", other),
        }
    }

    #[test]
    fn test_every_field_has_a_label() {
        let form = FormDescriptor::new(Layout::Single);
        assert!(form.fields().all(|f| !f.label.is_empty()));
    }

    #[test]
    fn test_default_record_is_valid() {
        for layout in [Layout::Single, Layout::TwoColumn] {
            let raw = FormDescriptor::new(layout).default_record();
            let record = CustomerRecord::from_raw(&raw).unwrap();
            assert_eq!(record.tenure, 12);
            assert_eq!(record.monthly_charges, 70.0);
        }
    }

    #[test]
    fn test_serialized_widget_shape() {
        let form = FormDescriptor::new(Layout::Single);
        let json = serde_json::to_value(form.field("tenure").unwrap()).unwrap();
        assert_eq!(json["widget"]["type"], "slider");
        assert_eq!(json["widget"]["max"], 72);
        assert_eq!(json["group"], "customer");
    }
}
