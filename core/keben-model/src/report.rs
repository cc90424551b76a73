use chrono::{DateTime, Utc};
use keben_types::{RemoteId, ReportId, SyncStatus};
use serde::{Deserialize, Serialize};

/// One material line on a delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}

impl MaterialLine {
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount,
            unit: unit.into(),
        }
    }
}

/// What was delivered.
///
/// Current reports carry a `materials` array. Reports saved before
/// multi-material support carry a single `material` string (and sometimes a
/// bare `amount`). Both shapes live in the same field position of the stored
/// JSON, so this is untagged and flattened into [`ReportDetails`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Materials {
    Lines {
        materials: Vec<MaterialLine>,
    },
    Legacy {
        material: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        amount: Option<f64>,
    },
}

impl Materials {
    /// Wraps a list of material lines.
    pub fn lines(lines: Vec<MaterialLine>) -> Self {
        Self::Lines { materials: lines }
    }

    /// A legacy single-material entry.
    pub fn legacy(material: impl Into<String>) -> Self {
        Self::Legacy {
            material: material.into(),
            amount: None,
        }
    }

    /// Returns the material lines, treating a legacy entry as one line.
    pub fn to_lines(&self) -> Vec<MaterialLine> {
        match self {
            Self::Lines { materials } => materials.clone(),
            Self::Legacy { material, amount } => vec![MaterialLine {
                name: material.clone(),
                amount: amount.unwrap_or(0.0),
                unit: String::new(),
            }],
        }
    }

    /// Number of material lines.
    pub fn len(&self) -> usize {
        match self {
            Self::Lines { materials } => materials.len(),
            Self::Legacy { .. } => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One-line description for lists, e.g. `5 tons Ballast 1/2, 200 pieces Machine Blocks 6x9`.
    pub fn summary(&self) -> String {
        match self {
            Self::Lines { materials } if materials.is_empty() => "—".to_string(),
            Self::Lines { materials } => materials
                .iter()
                .map(|m| {
                    let amount = m.amount.to_string();
                    [amount.as_str(), m.unit.as_str(), m.name.as_str()]
                        .iter()
                        .filter(|part| !part.is_empty())
                        .copied()
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join(", "),
            Self::Legacy { material, .. } if material.trim().is_empty() => "—".to_string(),
            Self::Legacy { material, .. } => material.clone(),
        }
    }
}

/// The business fields of a delivery report. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredDetails")]
pub struct ReportDetails {
    pub driver_name: String,
    pub truck_number: String,
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub materials: Materials,
    pub purchase_cost: f64,
    pub cess: f64,
    pub allowance: f64,
    /// Litres of fuel per day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_per_day: Option<f64>,
    /// Trip distance in km.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    pub amount_paid: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trips: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Details as found on disk. Older records call fuel `fuel` and distance
/// `mileage`, and some carry both spellings; the current name wins.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDetails {
    driver_name: String,
    truck_number: String,
    #[serde(alias = "from_location")]
    from: String,
    #[serde(alias = "to_location")]
    to: String,
    #[serde(flatten)]
    materials: Materials,
    purchase_cost: f64,
    cess: f64,
    allowance: f64,
    #[serde(default)]
    fuel_per_day: Option<f64>,
    #[serde(default)]
    fuel: Option<f64>,
    #[serde(default)]
    distance: Option<f64>,
    #[serde(default)]
    mileage: Option<f64>,
    amount_paid: f64,
    #[serde(default)]
    trips: Option<u32>,
    #[serde(default)]
    remarks: Option<String>,
}

impl From<StoredDetails> for ReportDetails {
    fn from(stored: StoredDetails) -> Self {
        Self {
            driver_name: stored.driver_name,
            truck_number: stored.truck_number,
            from: stored.from,
            to: stored.to,
            materials: stored.materials,
            purchase_cost: stored.purchase_cost,
            cess: stored.cess,
            allowance: stored.allowance,
            fuel_per_day: stored.fuel_per_day.or(stored.fuel),
            distance: stored.distance.or(stored.mileage),
            amount_paid: stored.amount_paid,
            trips: stored.trips,
            remarks: stored.remarks,
        }
    }
}

/// Validated details plus the id they will be stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub id: ReportId,
    pub details: ReportDetails,
}

impl ReportDraft {
    /// Assigns a fresh time-ordered id to validated details.
    pub fn new(details: ReportDetails) -> Self {
        Self {
            id: ReportId::new(),
            details,
        }
    }

    /// Uses a caller-chosen id (imports, tests).
    pub fn with_id(id: ReportId, details: ReportDetails) -> Self {
        Self { id, details }
    }

    /// Turns the draft into a stored report stamped at `timestamp`.
    pub fn into_report(self, timestamp: DateTime<Utc>) -> Report {
        Report {
            id: self.id,
            details: self.details,
            timestamp,
            sync_status: SyncStatus::Pending,
            remote_id: None,
        }
    }
}

/// A delivery report as kept in the local store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    #[serde(flatten)]
    pub details: ReportDetails,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub sync_status: SyncStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<RemoteId>,
}

impl Report {
    /// Material description for list views.
    pub fn material_summary(&self) -> String {
        self.details.materials.summary()
    }

    /// `from → to`.
    pub fn route(&self) -> String {
        format!("{} → {}", self.details.from, self.details.to)
    }

    /// Decodes a single stored record.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Encodes this record for storage.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
