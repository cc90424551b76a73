//! Unvalidated report input as it arrives from a form or a JSON file.

use serde::{Deserialize, Serialize};

/// A numeric form field. Browsers hand over text; JSON callers usually send
/// numbers. Both are accepted and checked by [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    /// Parses the field. `Ok(None)` means the field was left blank.
    pub(crate) fn parse(&self) -> Result<Option<f64>, ()> {
        match self {
            Self::Number(n) if n.is_finite() => Ok(Some(*n)),
            Self::Number(_) => Err(()),
            Self::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(None);
                }
                match s.parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(Some(n)),
                    _ => Err(()),
                }
            }
        }
    }
}

impl From<f64> for NumericInput {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for NumericInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// One material row of the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMaterial {
    pub name: String,
    pub amount: Option<NumericInput>,
    pub unit: Option<String>,
    /// Free-text name used when `name` is `Other`.
    pub other_name: Option<String>,
}

impl RawMaterial {
    pub fn new(name: impl Into<String>, amount: impl Into<NumericInput>, unit: &str) -> Self {
        Self {
            name: name.into(),
            amount: Some(amount.into()),
            unit: Some(unit.to_string()),
            other_name: None,
        }
    }
}

/// Everything a driver can submit, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawInput {
    pub driver_name: String,
    pub truck_number: String,
    pub from: String,
    pub to: String,
    pub materials: Vec<RawMaterial>,
    /// Legacy single-material field, used only when `materials` is empty.
    pub material: Option<String>,
    /// Free-text name for a legacy `material` of `Other`.
    pub other_material: Option<String>,
    pub purchase_cost: Option<NumericInput>,
    pub cess: Option<NumericInput>,
    pub allowance: Option<NumericInput>,
    #[serde(alias = "fuel")]
    pub fuel_per_day: Option<NumericInput>,
    #[serde(alias = "mileage")]
    pub distance: Option<NumericInput>,
    pub amount_paid: Option<NumericInput>,
    pub trips: Option<NumericInput>,
    pub remarks: Option<String>,
}
