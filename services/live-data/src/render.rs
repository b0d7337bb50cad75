//! Plain-text rendering of query states

use std::fmt::Write;

use chrono::DateTime;

use crate::model::{Alert, Station};
use crate::query::QueryState;

fn format_epoch_seconds(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

fn write_station(out: &mut String, station: &Station) {
    let pickup = if station.allow_pickup {
        "(Pickup allowed)"
    } else {
        "(Pickup not allowed)"
    };
    let _ = writeln!(out, "- {} {}", station.name, pickup);
    for vehicles in &station.available_vehicles.by_type {
        let _ = writeln!(
            out,
            "    {} {}(s)",
            vehicles.count,
            vehicles.vehicle_type.form_factor.to_lowercase()
        );
    }
}

/// Station inventory list
pub fn render_stations(state: &QueryState<Vec<Station>>) -> String {
    let mut out = String::from("Bike Rental Stations\n");

    if state.loading {
        out.push_str("Loading bike stations...\n");
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "Error loading bike stations: {}", error);
    }
    if state.loading || state.error.is_some() {
        return out;
    }

    for station in state.data.iter().flatten() {
        write_station(&mut out, station);
    }
    out
}

/// Station pins with coordinates; stations without a position are left off the map
pub fn render_bike_map(state: &QueryState<Vec<Station>>) -> String {
    let mut out = String::from("Live HSL Bike Map\n");

    // A refresh keeps the pins of the previous result unless it failed.
    if let Some(error) = &state.error {
        let _ = writeln!(out, "Error loading bike stations: {}", error);
        return out;
    }
    if state.loading && state.data.is_none() {
        out.push_str("Loading bike stations...\n");
        return out;
    }

    for station in state.data.iter().flatten() {
        let Some((lat, lon)) = station.coordinates() else {
            continue;
        };
        let _ = writeln!(
            out,
            "@ {:.5}, {:.5}  {} [{} available]",
            lat,
            lon,
            station.name,
            station.total_vehicles()
        );
    }
    out
}

/// Empty strings count as absent
fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn write_alert(out: &mut String, alert: &Alert) {
    let _ = writeln!(
        out,
        "- {}",
        non_empty(&alert.alert_header_text).unwrap_or("Alert")
    );
    let _ = writeln!(out, "  {}", alert.alert_description_text);
    if let Some(url) = non_empty(&alert.alert_url) {
        let _ = writeln!(out, "  More info: {}", url);
    }
    if let Some(level) = non_empty(&alert.alert_severity_level) {
        let _ = writeln!(out, "  Severity: {}", level);
    }
    // A zero date means unset
    let start = alert.effective_start_date.filter(|&d| d != 0);
    let end = alert.effective_end_date.filter(|&d| d != 0);
    if let (Some(start), Some(end)) = (start, end) {
        let _ = writeln!(
            out,
            "  Effective from {} to {}",
            format_epoch_seconds(start),
            format_epoch_seconds(end)
        );
    }
}

/// Disruption alert list
pub fn render_alerts(state: &QueryState<Vec<Alert>>) -> String {
    let mut out = String::from("Current Disruption Alerts\n");

    if state.loading {
        out.push_str("Loading disruption alerts...\n");
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "Error loading disruption alerts: {}", error);
    }
    if state.loading || state.error.is_some() {
        return out;
    }

    match &state.data {
        Some(alerts) if alerts.is_empty() => out.push_str("No current disruptions.\n"),
        Some(alerts) => alerts.iter().for_each(|alert| write_alert(&mut out, alert)),
        None => {}
    }
    out
}
