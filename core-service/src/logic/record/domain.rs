//! Field Domains - fixed enumerations accepted by the form
//!
//! Each categorical column has exactly one enum here. The text labels are the
//! values the pipeline's encoder was trained on and are matched exactly.
//! Option order follows the form (first option is the form default).

use serde::{Deserialize, Serialize};

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// All values, in form order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Label as seen by the pipeline
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Exact, case-sensitive lookup
            pub fn parse(label: &str) -> Option<Self> {
                match label {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Labels of all values, in form order
            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

categorical! {
    Gender {
        Male => "Male",
        Female => "Female",
    }
}

categorical! {
    /// partner, dependents, phoneservice, paperlessbilling
    YesNo {
        Yes => "Yes",
        No => "No",
    }
}

categorical! {
    MultipleLines {
        Yes => "Yes",
        No => "No",
        NoPhoneService => "No phone service",
    }
}

categorical! {
    InternetService {
        Dsl => "DSL",
        FiberOptic => "Fiber optic",
        No => "No",
    }
}

categorical! {
    /// onlinesecurity, onlinebackup, deviceprotection, techsupport,
    /// streamingtv, streamingmovies
    InternetAddon {
        Yes => "Yes",
        No => "No",
        NoInternetService => "No internet service",
    }
}

categorical! {
    Contract {
        MonthToMonth => "Month-to-month",
        OneYear => "One year",
        TwoYear => "Two year",
    }
}

categorical! {
    PaymentMethod {
        ElectronicCheck => "Electronic check",
        MailedCheck => "Mailed check",
        BankTransfer => "Bank transfer (automatic)",
        CreditCard => "Credit card (automatic)",
    }
}

/// Inclusive tenure range in months
pub const TENURE_MIN: i64 = 0;
pub const TENURE_MAX: i64 = 72;

/// Allowed labels for a categorical column, `None` for numeric columns
pub fn allowed_labels(column: &str) -> Option<Vec<&'static str>> {
    match column {
        "gender" => Some(Gender::labels()),
        "seniorcitizen" => Some(vec!["0", "1"]),
        "partner" | "dependents" | "phoneservice" | "paperlessbilling" => Some(YesNo::labels()),
        "multiplelines" => Some(MultipleLines::labels()),
        "internetservice" => Some(InternetService::labels()),
        "onlinesecurity" | "onlinebackup" | "deviceprotection" | "techsupport"
        | "streamingtv" | "streamingmovies" => Some(InternetAddon::labels()),
        "contract" => Some(Contract::labels()),
        "paymentmethod" => Some(PaymentMethod::labels()),
        _ => None,
    }
}
