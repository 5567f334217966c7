// Joins a drive's summary row with its "Detailed Information" block

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::{Diagnostic, PhysicalDriveReport};
use crate::perccli::schema::{DeviceAttributes, DriveSettings, DriveState, PdEntry};

/// Enclosure and slot from an `EID:Slt` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveSlot {
    /// `None` for drives attached without an enclosure (`" :3"`).
    pub enclosure: Option<String>,
    pub slot: String,
}

impl DriveSlot {
    /// `"E:S"`; anything after a second `:` is ignored.
    pub fn parse(eid_slot: &str) -> Option<Self> {
        let mut parts = eid_slot.split(':');
        let (enclosure, slot) = (parts.next()?, parts.next()?);
        let enclosure = if enclosure.trim().is_empty() {
            None
        } else {
            Some(enclosure.to_string())
        };
        Some(Self {
            enclosure,
            slot: slot.to_string(),
        })
    }

    /// Key prefix perccli uses for this drive, e.g. `Drive /c0/e252/s3`.
    pub fn identifier(&self, controller: u32) -> String {
        match &self.enclosure {
            Some(e) => format!("Drive /c{}/e{}/s{}", controller, e, self.slot),
            None => format!("Drive /c{}/s{}", controller, self.slot),
        }
    }
}

/// Integer part of a speed like `"12.0Gb/s"`.
pub fn speed_gbps(raw: &str) -> Option<u32> {
    let whole = raw.split('.').next()?.trim();
    let digits: String = whole.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn is_yes(value: Option<&String>) -> Option<bool> {
    value.map(|v| v == "Yes")
}

fn sub_block<'a>(
    info: &'a Map<String, Value>,
    key: String,
    scope: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<&'a Value> {
    let value = info.get(&key);
    if value.is_none() {
        diagnostics.push(Diagnostic::new(scope, key, "missing"));
    }
    value
}

fn parse_sub_block<'a, T: Deserialize<'a>>(
    value: &'a Value,
    field: &str,
    scope: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<T> {
    match T::deserialize(value) {
        Ok(v) => Some(v),
        Err(e) => {
            diagnostics.push(Diagnostic::new(scope, field, e));
            None
        }
    }
}

/// Build one drive report, or `None` (with a diagnostic) when the detailed
/// state, attributes or settings block is missing or malformed.
pub fn correlate(
    entry: &PdEntry,
    details: &Map<String, Value>,
    controller: u32,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<PhysicalDriveReport> {
    let Some(slot) = DriveSlot::parse(&entry.eid_slot) else {
        diagnostics.push(Diagnostic::new(
            format!("controller {}", controller),
            "EID:Slt",
            format!("cannot split {:?} into enclosure and slot", entry.eid_slot),
        ));
        return None;
    };
    let id = slot.identifier(controller);

    let info = sub_block(
        details,
        format!("{} - Detailed Information", id),
        &id,
        diagnostics,
    )?;
    let Some(info) = info.as_object() else {
        diagnostics.push(Diagnostic::new(
            &id,
            "Detailed Information",
            "not an object",
        ));
        return None;
    };

    let state = sub_block(info, format!("{} State", id), &id, diagnostics)?;
    let attributes = sub_block(info, format!("{} Device attributes", id), &id, diagnostics)?;
    let settings = sub_block(info, format!("{} Policies/Settings", id), &id, diagnostics)?;

    let state: DriveState = parse_sub_block(state, "State", &id, diagnostics)?;
    let attributes: DeviceAttributes =
        parse_sub_block(attributes, "Device attributes", &id, diagnostics)?;
    let settings: DriveSettings = parse_sub_block(settings, "Policies/Settings", &id, diagnostics)?;

    let mut speed = |raw: Option<&String>, field: &str| {
        let raw = raw?;
        let parsed = speed_gbps(raw);
        if parsed.is_none() {
            diagnostics.push(Diagnostic::new(
                &id,
                field,
                format!("unparseable speed {:?}", raw),
            ));
        }
        parsed
    };
    let link_speed_gbps = speed(attributes.link_speed.as_ref(), "Link Speed");
    let device_speed_gbps = speed(attributes.device_speed.as_ref(), "Device Speed");

    Some(PhysicalDriveReport {
        controller,
        enclosure: slot.enclosure.unwrap_or_default(),
        slot: slot.slot,
        device_id: entry.device_id.clone(),
        interface: entry.interface.clone(),
        media: entry.media.clone(),
        // fixed-width, space padded
        model: entry.model.trim().to_string(),
        drive_group: entry.drive_group.clone(),
        state: entry.state.clone(),
        firmware: attributes.firmware_revision.trim().to_string(),
        serial: attributes.serial_number.trim().to_string(),
        shield_counter: state.shield_counter,
        media_errors: state.media_error_count,
        other_errors: state.other_error_count,
        predictive_errors: state.predictive_failure_count,
        smart_alert: is_yes(state.smart_alert.as_ref()),
        link_speed_gbps,
        device_speed_gbps,
        commissioned_spare: is_yes(settings.commissioned_spare.as_ref()),
        emergency_spare: is_yes(settings.emergency_spare.as_ref()),
    })
}
