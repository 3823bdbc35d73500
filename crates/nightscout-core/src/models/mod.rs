// ABOUTME: Core data models for glucose readings, treatments, and devices
// ABOUTME: Immutable values built from Nightscout payloads, stored in mg/dL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

mod device;
mod range;
mod reading;
mod status;
mod treatment;

pub use device::{DeviceKind, DeviceStatus};
pub use range::DateRange;
pub use reading::{Reading, TrendDirection};
pub use status::{ServerStatus, ServerThresholds};
pub use treatment::{Treatment, TreatmentKind};
