//! Delivery report model for Keben.
//!
//! Defines the one canonical report shape every other crate depends on:
//! - [`Report`]: a stored delivery report (id, business fields, timestamp, sync status)
//! - [`ReportDetails`]: the immutable business fields captured from a driver
//! - [`Materials`]: multi-material lines, or the legacy single material string
//! - [`RawInput`] and [`validate`]: turning form input into `ReportDetails`
//!
//! Stored JSON uses camelCase field names. Records written by older app
//! versions (single `material`, `mileage`, `fuel`, `from_location`) are still
//! readable.

mod catalog;
mod input;
mod report;
mod validate;

pub use catalog::{default_unit, is_known_material, MATERIAL_OPTIONS, OTHER_MATERIAL};
pub use input::{NumericInput, RawInput, RawMaterial};
pub use report::{MaterialLine, Materials, Report, ReportDetails, ReportDraft};
pub use validate::{
    validate, FieldError, ValidationErrors, MAX_DRIVER_NAME_LEN, MAX_LOCATION_LEN,
    MAX_MATERIAL_NAME_LEN, MAX_REMARKS_LEN, MAX_TRUCK_NUMBER_LEN,
};
