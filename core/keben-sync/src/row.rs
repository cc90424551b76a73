//! The row shape shared by the remote table and its change-feed consumers.

use chrono::{DateTime, SecondsFormat, Utc};
use keben_model::{MaterialLine, Materials, Report};
use keben_types::RemoteId;
use serde::{Deserialize, Deserializer, Serialize};

/// Column headers of the spreadsheet fed from the remote table, in order.
pub const SHEET_COLUMNS: [&str; 11] = [
    "id",
    "driver_name",
    "truck_number",
    "material_type",
    "delivery_from",
    "delivery_to",
    "mileage",
    "allowance",
    "fuel_per_day",
    "remarks",
    "created_at",
];

/// A report as inserted into the remote `reports` table.
///
/// `material` and `amount` keep the single-material columns populated for
/// consumers that predate the `materials` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteReportRow {
    /// Primary key assigned by the remote. Only present on rows read back
    /// from the table or its change feed.
    #[serde(default, skip_serializing, deserialize_with = "remote_id_from_json")]
    pub id: Option<RemoteId>,
    pub local_id: String,
    pub driver_name: String,
    pub truck_number: String,
    pub from_location: String,
    pub to_location: String,
    pub material: String,
    #[serde(default)]
    pub materials: Vec<MaterialLine>,
    pub amount: Option<f64>,
    pub trips: Option<u32>,
    pub purchase_cost: f64,
    pub cess: f64,
    pub allowance: f64,
    pub fuel_per_day: Option<f64>,
    pub distance: Option<f64>,
    pub amount_paid: f64,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RemoteReportRow {
    /// Builds the insert payload for a stored report.
    pub fn from_report(report: &Report) -> Self {
        let details = &report.details;
        let (material, amount) = match &details.materials {
            Materials::Legacy { material, amount } => (material.clone(), *amount),
            Materials::Lines { materials } => (
                materials
                    .iter()
                    .map(|m| m.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                match materials.as_slice() {
                    [only] => Some(only.amount),
                    _ => None,
                },
            ),
        };

        Self {
            id: None,
            local_id: report.id.to_string(),
            driver_name: details.driver_name.clone(),
            truck_number: details.truck_number.clone(),
            from_location: details.from.clone(),
            to_location: details.to.clone(),
            material,
            materials: details.materials.to_lines(),
            amount,
            trips: details.trips,
            purchase_cost: details.purchase_cost,
            cess: details.cess,
            allowance: details.allowance,
            fuel_per_day: details.fuel_per_day,
            distance: details.distance,
            amount_paid: details.amount_paid,
            remarks: details.remarks.clone(),
            created_at: report.timestamp,
        }
    }

    /// Decodes a record delivered by the table's change feed.
    pub fn from_feed(record: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(record)
    }

    /// The row as spreadsheet cells, ordered like [`SHEET_COLUMNS`].
    ///
    /// Rows without a remote id fall back to the local id.
    pub fn sheet_row(&self) -> Vec<String> {
        let id = self
            .id
            .as_ref()
            .map_or_else(|| self.local_id.clone(), RemoteId::to_string);

        vec![
            id,
            self.driver_name.clone(),
            self.truck_number.clone(),
            self.material.clone(),
            self.from_location.clone(),
            self.to_location.clone(),
            optional_cell(self.distance),
            self.allowance.to_string(),
            optional_cell(self.fuel_per_day),
            self.remarks.clone().unwrap_or_default(),
            self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ]
    }
}

fn optional_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn remote_id_from_json<'de, D>(deserializer: D) -> Result<Option<RemoteId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(RemoteId::from_json(&value))
}
