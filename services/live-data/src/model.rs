//! Typed payloads of the fixed transit queries

use serde::{Deserialize, Serialize};

/// A bike-rental station and its current inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub station_id: String,
    pub name: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub allow_pickup: bool,
    #[serde(default)]
    pub available_vehicles: AvailableVehicles,
}

impl Station {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lon?))
    }

    pub fn total_vehicles(&self) -> u32 {
        self.available_vehicles.by_type.iter().map(|v| v.count).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableVehicles {
    #[serde(default)]
    pub by_type: Vec<VehicleCountByType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCountByType {
    pub count: u32,
    pub vehicle_type: VehicleType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleType {
    pub form_factor: String,
}

/// A service disruption alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(default)]
    pub alert_header_text: Option<String>,
    #[serde(default)]
    pub alert_description_text: String,
    #[serde(default)]
    pub alert_url: Option<String>,
    /// Epoch seconds
    #[serde(default)]
    pub effective_start_date: Option<i64>,
    /// Epoch seconds
    #[serde(default)]
    pub effective_end_date: Option<i64>,
    #[serde(default)]
    pub alert_severity_level: Option<String>,
    #[serde(default)]
    pub entities: Option<Vec<AlertEntity>>,
}

/// Route or stop an alert applies to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEntity {
    #[serde(rename = "__typename")]
    pub typename: String,
    #[serde(default)]
    pub gtfs_id: Option<String>,
}
