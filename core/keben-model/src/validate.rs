//! Input validation.
//!
//! [`validate`] checks every field and reports all problems at once so a form
//! can mark each offending input, rather than stopping at the first.

use crate::catalog::{default_unit, OTHER_MATERIAL};
use crate::input::{NumericInput, RawInput, RawMaterial};
use crate::report::{MaterialLine, Materials, ReportDetails};
use std::fmt;

pub const MAX_DRIVER_NAME_LEN: usize = 100;
pub const MAX_TRUCK_NUMBER_LEN: usize = 50;
pub const MAX_LOCATION_LEN: usize = 100;
pub const MAX_MATERIAL_NAME_LEN: usize = 100;
pub const MAX_REMARKS_LEN: usize = 500;

/// A single invalid field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field path in the input, e.g. `driverName` or `materials[1].amount`.
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field error found in one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Returns the message for `field`, if that field failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Names of the failed fields, in input order.
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid report: ")?;
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validates raw input into report details.
pub fn validate(input: &RawInput) -> Result<ReportDetails, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let driver_name = required_text(
        &mut errors,
        "driverName",
        &input.driver_name,
        MAX_DRIVER_NAME_LEN,
    );
    let truck_number = required_text(
        &mut errors,
        "truckNumber",
        &input.truck_number,
        MAX_TRUCK_NUMBER_LEN,
    );
    let from = required_text(&mut errors, "from", &input.from, MAX_LOCATION_LEN);
    let to = required_text(&mut errors, "to", &input.to, MAX_LOCATION_LEN);

    let materials = parse_materials(&mut errors, input);

    let purchase_cost = required_amount(&mut errors, "purchaseCost", input.purchase_cost.as_ref());
    let cess = required_amount(&mut errors, "cess", input.cess.as_ref());
    let allowance = required_amount(&mut errors, "allowance", input.allowance.as_ref());
    let amount_paid = required_amount(&mut errors, "amountPaid", input.amount_paid.as_ref());
    let fuel_per_day = optional_amount(&mut errors, "fuelPerDay", input.fuel_per_day.as_ref());
    let distance = optional_amount(&mut errors, "distance", input.distance.as_ref());
    let trips = parse_trips(&mut errors, input.trips.as_ref());

    let remarks = input
        .remarks
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);
    if remarks
        .as_ref()
        .is_some_and(|r| r.chars().count() > MAX_REMARKS_LEN)
    {
        errors.push("remarks", format!("must be at most {MAX_REMARKS_LEN} characters"));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ReportDetails {
        driver_name,
        truck_number,
        from,
        to,
        materials,
        purchase_cost,
        cess,
        allowance,
        fuel_per_day,
        distance,
        amount_paid,
        trips,
        remarks,
    })
}

fn required_text(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, "is required");
    } else if trimmed.chars().count() > max {
        errors.push(field, format!("must be at most {max} characters"));
    }
    trimmed.to_string()
}

fn required_amount(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&NumericInput>,
) -> f64 {
    match value.map(NumericInput::parse) {
        None | Some(Ok(None)) => {
            errors.push(field, "is required");
            0.0
        }
        Some(Ok(Some(n))) => non_negative(errors, field, n),
        Some(Err(())) => {
            errors.push(field, "must be a number");
            0.0
        }
    }
}

fn optional_amount(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&NumericInput>,
) -> Option<f64> {
    match value.map(NumericInput::parse) {
        None | Some(Ok(None)) => None,
        Some(Ok(Some(n))) => Some(non_negative(errors, field, n)),
        Some(Err(())) => {
            errors.push(field, "must be a number");
            None
        }
    }
}

fn non_negative(errors: &mut ValidationErrors, field: &str, n: f64) -> f64 {
    if n < 0.0 {
        errors.push(field, "must be zero or greater");
    }
    n
}

fn parse_trips(errors: &mut ValidationErrors, value: Option<&NumericInput>) -> Option<u32> {
    let n = optional_amount(errors, "trips", value)?;
    if n.fract() != 0.0 || n > f64::from(u32::MAX) {
        errors.push("trips", "must be a whole number");
        return None;
    }
    if n < 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(n as u32)
}

fn parse_materials(errors: &mut ValidationErrors, input: &RawInput) -> Materials {
    if input.materials.is_empty() {
        if let Some(legacy) = input.material.as_deref() {
            let name = resolve_name(legacy, input.other_material.as_deref());
            if name.is_empty() {
                errors.push("material", "is required");
            } else if name.chars().count() > MAX_MATERIAL_NAME_LEN {
                errors.push(
                    "material",
                    format!("must be at most {MAX_MATERIAL_NAME_LEN} characters"),
                );
            }
            return Materials::legacy(name);
        }
        errors.push("materials", "at least one material is required");
        return Materials::lines(Vec::new());
    }

    let lines = input
        .materials
        .iter()
        .enumerate()
        .map(|(i, raw)| material_line(errors, i, raw))
        .collect();
    Materials::lines(lines)
}

fn material_line(errors: &mut ValidationErrors, index: usize, raw: &RawMaterial) -> MaterialLine {
    let name_field = format!("materials[{index}].name");
    let amount_field = format!("materials[{index}].amount");

    let name = resolve_name(&raw.name, raw.other_name.as_deref());
    if name.is_empty() {
        errors.push(&name_field, "is required");
    } else if name.chars().count() > MAX_MATERIAL_NAME_LEN {
        errors.push(&name_field, format!("must be at most {MAX_MATERIAL_NAME_LEN} characters"));
    }

    let amount = match raw.amount.as_ref().map(NumericInput::parse) {
        None | Some(Ok(None)) => {
            errors.push(&amount_field, "is required");
            0.0
        }
        Some(Ok(Some(n))) if n > 0.0 => n,
        Some(Ok(Some(n))) => {
            errors.push(&amount_field, "must be greater than zero");
            n
        }
        Some(Err(())) => {
            errors.push(&amount_field, "must be a number");
            0.0
        }
    };

    let unit = raw
        .unit
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map_or_else(|| default_unit(&name).to_string(), str::to_string);

    MaterialLine { name, amount, unit }
}

/// `Other` takes its name from the driver's free text; blank free text keeps `Other`.
fn resolve_name(name: &str, other: Option<&str>) -> String {
    let name = name.trim();
    if name.eq_ignore_ascii_case(OTHER_MATERIAL) {
        return other
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .unwrap_or(OTHER_MATERIAL)
            .to_string();
    }
    name.to_string()
}
