// mpt3sas pass-through HBAs: status, ports and drives from "Physical Device Information"

use serde::Deserialize;
use serde_json::Value;

use super::{FamilyExtractor, PendingDrives, physical, required};
use crate::models::{ControllerHealth, ControllerReport, Diagnostic};
use crate::perccli::schema::{HbaBlock, PdEntry};

const DETAILED_INFORMATION: &str = "Detailed Information";

pub struct HbaExtractor;

impl FamilyExtractor for HbaExtractor {
    fn extract(
        &self,
        block: &Value,
        report: &mut ControllerReport,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<PendingDrives> {
        let scope = format!("controller {}", report.index);
        let hba = match HbaBlock::deserialize(block) {
            Ok(h) => h,
            Err(e) => {
                diagnostics.push(Diagnostic::new(&scope, "HBA block", e));
                return None;
            }
        };

        if let Some(s) = required(
            hba.status.and_then(|s| s.controller_status),
            &scope,
            "Status/Controller Status",
            diagnostics,
        ) {
            report.health = Some(if s == "OK" {
                ControllerHealth::Healthy
            } else {
                ControllerHealth::Unknown
            });
        }

        report.port_count = required(
            hba.hw_cfg.and_then(|h| h.backend_port_count),
            &scope,
            "HwCfg/Backend Port Count",
            diagnostics,
        )
        .map(|n| n.0);

        let devices = required(
            hba.physical_devices,
            &scope,
            "Physical Device Information",
            diagnostics,
        )?;

        // Every drive is listed twice: a basic entry and a "Detailed Information" entry.
        // The count assumes that pairing holds.
        if devices.len() % 2 != 0 {
            tracing::warn!(
                controller = report.index,
                entries = devices.len(),
                "odd number of physical device entries; drive count will be fractional"
            );
        }
        report.physical_drive_count = Some(devices.len() as f64 / 2.0);

        for (key, value) in &devices {
            if key.contains(DETAILED_INFORMATION) {
                continue;
            }
            let entry = match value.get(0).map(PdEntry::deserialize) {
                Some(Ok(e)) => e,
                Some(Err(e)) => {
                    diagnostics.push(Diagnostic::new(key.as_str(), "basic entry", e));
                    continue;
                }
                None => {
                    diagnostics.push(Diagnostic::new(
                        key.as_str(),
                        "basic entry",
                        "expected a non-empty list",
                    ));
                    continue;
                }
            };
            if let Some(drive) = physical::correlate(&entry, &devices, report.index, diagnostics)
            {
                super::push_drive(report, drive, diagnostics);
            }
        }
        None
    }
}
