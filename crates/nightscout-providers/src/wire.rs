// ABOUTME: Nightscout JSON wire formats and their conversion into core models
// ABOUTME: Numeric fields are read leniently since uploaders disagree on types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use chrono::{DateTime, NaiveDateTime, Utc};
use nightscout_core::models::{
    DeviceKind, DeviceStatus, Reading, ServerStatus, ServerThresholds, Treatment, TreatmentKind,
    TrendDirection,
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept numbers and numeric strings, treat anything else as absent
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(lenient_number))
}

fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Parse the timestamp formats Nightscout uploaders emit
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

fn from_millis(millis: f64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis as i64)
}

/// Epoch milliseconds of a raw entry, even when the rest of it is unusable
#[must_use]
pub fn entry_millis(value: &Value) -> Option<i64> {
    value
        .get("date")
        .and_then(lenient_number)
        .and_then(from_millis)
        .or_else(|| {
            value
                .get("dateString")
                .and_then(Value::as_str)
                .and_then(parse_timestamp)
        })
        .map(|instant| instant.timestamp_millis())
}

/// `/api/v1/entries.json` element
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "_id")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    sgv: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    date: Option<f64>,
    #[serde(rename = "dateString")]
    date_string: Option<String>,
    direction: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    delta: Option<f64>,
    device: Option<String>,
}

/// Convert one entry into a [`Reading`]
///
/// # Errors
///
/// Returns a reason when the entry has no usable value or timestamp.
pub fn reading_from_value(value: &Value) -> Result<Reading, String> {
    let raw = RawEntry::deserialize(value).map_err(|e| e.to_string())?;
    let sgv = raw
        .sgv
        .filter(|v| *v > 0.0)
        .ok_or("entry has no positive sgv value")?;
    let timestamp = raw
        .date
        .and_then(from_millis)
        .or_else(|| raw.date_string.as_deref().and_then(parse_timestamp))
        .ok_or("entry has no parseable date")?;

    Ok(Reading {
        timestamp,
        value_mgdl: sgv,
        direction: raw
            .direction
            .as_deref()
            .map_or(TrendDirection::None, TrendDirection::from_nightscout),
        delta_mgdl: raw.delta,
        device: raw.device,
        id: raw.id,
    })
}

/// `/api/v1/treatments.json` element
#[derive(Debug, Deserialize)]
struct RawTreatment {
    created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    mills: Option<f64>,
    #[serde(rename = "eventType")]
    event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    insulin: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    carbs: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    duration: Option<f64>,
    notes: Option<String>,
    #[serde(rename = "enteredBy")]
    entered_by: Option<String>,
}

/// Convert one treatment record
///
/// # Errors
///
/// Returns a reason when the record has no usable timestamp.
pub fn treatment_from_value(value: &Value) -> Result<Treatment, String> {
    let raw = RawTreatment::deserialize(value).map_err(|e| e.to_string())?;
    let timestamp = raw
        .created_at
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| raw.mills.and_then(from_millis))
        .ok_or("treatment has no parseable created_at")?;

    let kind = match raw.event_type.as_deref() {
        Some(event_type) if !event_type.trim().is_empty() => {
            TreatmentKind::from_event_type(event_type)
        }
        _ if raw.insulin.is_some() && raw.carbs.is_some() => TreatmentKind::MealBolus,
        _ if raw.insulin.is_some() => TreatmentKind::Bolus,
        _ if raw.carbs.is_some() => TreatmentKind::CarbCorrection,
        _ => TreatmentKind::Note,
    };

    Ok(Treatment {
        timestamp,
        kind,
        insulin_units: raw.insulin.filter(|v| *v > 0.0),
        carbs_grams: raw.carbs.filter(|v| *v > 0.0),
        duration_minutes: raw.duration,
        notes: raw.notes.filter(|n| !n.trim().is_empty()),
        entered_by: raw.entered_by,
    })
}

#[derive(Debug, Default, Deserialize)]
struct RawUploader {
    #[serde(default, deserialize_with = "lenient_f64")]
    battery: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPumpBattery {
    #[serde(default, deserialize_with = "lenient_f64")]
    percent: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPump {
    #[serde(default, deserialize_with = "lenient_f64")]
    reservoir: Option<f64>,
    battery: Option<RawPumpBattery>,
}

/// `/api/v1/devicestatus.json` element
#[derive(Debug, Deserialize)]
struct RawDeviceStatus {
    created_at: Option<String>,
    device: Option<String>,
    uploader: Option<RawUploader>,
    pump: Option<RawPump>,
    #[serde(rename = "loop")]
    loop_status: Option<Value>,
    openaps: Option<Value>,
}

fn classify_device(raw: &RawDeviceStatus, name: &str) -> DeviceKind {
    let lower = name.to_lowercase();
    if raw.loop_status.is_some() || raw.openaps.is_some() {
        DeviceKind::Loop
    } else if raw.pump.is_some() {
        DeviceKind::Pump
    } else if ["xdrip", "dexcom", "libre", "cgm", "share"]
        .iter()
        .any(|marker| lower.contains(marker))
    {
        DeviceKind::Cgm
    } else if raw.uploader.is_some() {
        DeviceKind::Uploader
    } else {
        DeviceKind::Unknown
    }
}

/// Convert one device status record
///
/// # Errors
///
/// Returns a reason when the record has no usable timestamp.
pub fn device_status_from_value(value: &Value) -> Result<DeviceStatus, String> {
    let raw = RawDeviceStatus::deserialize(value).map_err(|e| e.to_string())?;
    let timestamp = raw
        .created_at
        .as_deref()
        .and_then(parse_timestamp)
        .ok_or("device status has no parseable created_at")?;

    let device = raw.device.clone().unwrap_or_else(|| "unknown".to_owned());
    let kind = classify_device(&raw, &device);
    let pump_battery = raw
        .pump
        .as_ref()
        .and_then(|p| p.battery.as_ref())
        .and_then(|b| b.percent);
    let battery_pct = raw.uploader.as_ref().and_then(|u| u.battery).or(pump_battery);

    Ok(DeviceStatus {
        timestamp,
        kind,
        device,
        battery_pct,
        reservoir_units: raw.pump.as_ref().and_then(|p| p.reservoir),
        raw: value.clone(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct RawThresholds {
    #[serde(rename = "bgHigh", default, deserialize_with = "lenient_f64")]
    bg_high: Option<f64>,
    #[serde(rename = "bgTargetTop", default, deserialize_with = "lenient_f64")]
    bg_target_top: Option<f64>,
    #[serde(rename = "bgTargetBottom", default, deserialize_with = "lenient_f64")]
    bg_target_bottom: Option<f64>,
    #[serde(rename = "bgLow", default, deserialize_with = "lenient_f64")]
    bg_low: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    units: Option<String>,
    thresholds: Option<RawThresholds>,
}

/// `/api/v1/status.json` body
#[derive(Debug, Deserialize)]
struct RawStatus {
    name: Option<String>,
    version: Option<String>,
    #[serde(rename = "serverTime")]
    server_time: Option<String>,
    #[serde(rename = "apiEnabled")]
    api_enabled: Option<bool>,
    #[serde(default)]
    settings: Value,
}

/// Convert the status body
///
/// # Errors
///
/// Returns a reason when the body is not a status object.
pub fn server_status_from_value(value: &Value) -> Result<ServerStatus, String> {
    if !value.is_object() {
        return Err("status body is not a JSON object".to_owned());
    }
    let raw = RawStatus::deserialize(value).map_err(|e| e.to_string())?;
    let settings = RawSettings::deserialize(&raw.settings).unwrap_or_default();
    let thresholds = settings.thresholds.map(|t| ServerThresholds {
        bg_high: t.bg_high,
        bg_target_top: t.bg_target_top,
        bg_target_bottom: t.bg_target_bottom,
        bg_low: t.bg_low,
    });

    Ok(ServerStatus {
        name: raw.name,
        version: raw.version,
        server_time: raw.server_time,
        units: settings.units,
        thresholds,
        api_enabled: raw.api_enabled,
        settings: raw.settings,
    })
}
