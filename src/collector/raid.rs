// MegaRAID controllers: status, backup units, clock skew, virtual drives, drive summary

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;

use super::{FamilyExtractor, PendingDrives, parsed, required};
use crate::models::{
    BackupUnitKind, BackupUnitReport, ControllerHealth, ControllerReport, Diagnostic,
    VirtualDriveReport,
};
use crate::perccli::schema::{BackupUnitEntry, BbuStatus, Lenient, PdEntry, RaidBlock};

/// BBU status codes that count as healthy: 0 normal, 8 charging, 4096 learn cycle pending.
const BBU_HEALTHY_CODES: [i64; 3] = [0, 8, 4096];
const CONTROLLER_TIME_FORMAT: &str = "%m/%d/%Y, %H:%M:%S";

pub struct RaidExtractor;

impl FamilyExtractor for RaidExtractor {
    fn extract(
        &self,
        block: &Value,
        report: &mut ControllerReport,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<PendingDrives> {
        let scope = format!("controller {}", report.index);
        let raid = match RaidBlock::deserialize(block) {
            Ok(r) => r,
            Err(e) => {
                diagnostics.push(Diagnostic::new(&scope, "RAID block", e));
                return None;
            }
        };

        let status = raid.status.unwrap_or_default();
        if let Some(s) = required(
            status.controller_status,
            &scope,
            "Status/Controller Status",
            diagnostics,
        ) {
            report.health = Some(health(&s));
        }
        if let Some(bbu) = required(status.bbu_status, &scope, "Status/BBU Status", diagnostics) {
            report.battery_backup_healthy = bbu_healthy(&bbu);
        }

        report.port_count = required(
            raid.hw_cfg.and_then(|h| h.backend_port_count),
            &scope,
            "HwCfg/Backend Port Count",
            diagnostics,
        )
        .map(|n| n.0);

        report.scheduled_patrol_read = required(
            raid.scheduled_tasks.and_then(|t| t.patrol_read_reoccurrence),
            &scope,
            "Scheduled Tasks/Patrol Read Reoccurrence",
            diagnostics,
        )
        .map(|r| patrol_read_scheduled(&r));

        let mut units = backup_units_of(
            BackupUnitKind::CacheVault,
            raid.cachevault_info,
            &scope,
            diagnostics,
        );
        units.extend(backup_units_of(
            BackupUnitKind::Bbu,
            raid.bbu_info,
            &scope,
            diagnostics,
        ));
        report.backup_units = units;

        let system = required(
            raid.basics.system_time,
            &scope,
            "Basics/Current System Date/time",
            diagnostics,
        );
        let controller = required(
            raid.basics.controller_time,
            &scope,
            "Basics/Current Controller Date/Time",
            diagnostics,
        );
        if let (Some(system), Some(controller)) = (system, controller) {
            match clock_skew(&system, &controller) {
                Ok(skew) => report.clock_skew_secs = Some(skew),
                Err(e) => diagnostics.push(Diagnostic::new(&scope, "Basics/Date/Time", e)),
            }
        }

        // No drive group summary means a JBOD setup: no VD metrics at all.
        if let Some(drive_groups) = raid.drive_groups {
            report.drive_group_count =
                parsed(drive_groups, &scope, "Drive Groups", diagnostics).map(|n| n.0);
            report.virtual_drive_count =
                required(raid.virtual_drives, &scope, "Virtual Drives", diagnostics).map(|n| n.0);
            match raid.vd_list {
                Some(rows) => {
                    for (i, row) in rows.into_iter().enumerate() {
                        let field = format!("VD LIST[{}]", i);
                        let Some(vd) = parsed(row, &scope, &field, diagnostics) else {
                            continue;
                        };
                        let (drive_group, volume_group) =
                            match split_position(vd.position.as_deref()) {
                                Ok(ids) => ids,
                                Err(raw) => {
                                    diagnostics.push(Diagnostic::new(
                                        &scope,
                                        format!("{}/DG/VD", field),
                                        format!("unparseable position {:?}", raw),
                                    ));
                                    (-1, -1)
                                }
                            };
                        report.virtual_drives.push(VirtualDriveReport {
                            drive_group,
                            volume_group,
                            name: vd.name,
                            cache: vd.cache,
                            raid_type: vd.raid_type,
                            state: vd.state,
                        });
                    }
                }
                None => diagnostics.push(Diagnostic::new(&scope, "VD LIST", "missing")),
            }
        }

        let count = required(raid.physical_drives, &scope, "Physical Drives", diagnostics)?.0;
        report.physical_drive_count = Some(count);
        if count <= 0.0 {
            return None;
        }
        let Some(rows) = raid.pd_list else {
            diagnostics.push(Diagnostic::new(&scope, "PD LIST", "missing"));
            return None;
        };
        let drives: Vec<PdEntry> = rows
            .into_iter()
            .enumerate()
            .filter_map(|(i, row)| parsed(row, &scope, &format!("PD LIST[{}]", i), diagnostics))
            .collect();
        if drives.is_empty() {
            return None;
        }
        Some(PendingDrives {
            controller: report.index,
            drives,
        })
    }
}

fn health(controller_status: &str) -> ControllerHealth {
    match controller_status {
        "Optimal" => ControllerHealth::Healthy,
        "Degraded" => ControllerHealth::Degraded,
        "Failed" => ControllerHealth::Failed,
        _ => ControllerHealth::Unknown,
    }
}

/// `None` when no unit is fitted (`NA`).
fn bbu_healthy(status: &BbuStatus) -> Option<bool> {
    match status {
        BbuStatus::Text(t) if t == "NA" => None,
        BbuStatus::Text(_) => Some(false),
        BbuStatus::Code(code) => Some(BBU_HEALTHY_CODES.contains(code)),
    }
}

/// Patrol reads run on a schedule when the recurrence is given in hours, e.g. `"168 hrs"`.
fn patrol_read_scheduled(reoccurrence: &str) -> bool {
    reoccurrence.contains("hrs")
}

fn backup_units_of(
    kind: BackupUnitKind,
    entries: Vec<Lenient<BackupUnitEntry>>,
    scope: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<BackupUnitReport> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let entry = parsed(entry, scope, &format!("{:?}[{}]", kind, index), diagnostics)
                .unwrap_or_default();
            let temperature = entry.temp.as_deref().and_then(|raw| {
                let celsius = raw.replace('C', "").trim().parse::<f64>().ok();
                if celsius.is_none() {
                    diagnostics.push(Diagnostic::new(
                        scope,
                        format!("{:?}[{}]/Temp", kind, index),
                        format!("unparseable temperature {:?}", raw),
                    ));
                }
                celsius
            });
            BackupUnitReport {
                kind,
                index,
                temperature,
            }
        })
        .collect()
}

/// Absolute difference between host and controller clocks, in whole seconds.
fn clock_skew(system: &str, controller: &str) -> Result<i64, chrono::ParseError> {
    let system = NaiveDateTime::parse_from_str(system.trim(), CONTROLLER_TIME_FORMAT)?;
    let controller = NaiveDateTime::parse_from_str(controller.trim(), CONTROLLER_TIME_FORMAT)?;
    Ok((system - controller).num_seconds().abs())
}

/// `"N/M"` into (drive group, volume group); an absent field is (-1, -1).
/// On a malformed field the raw text is returned as the error.
fn split_position(position: Option<&str>) -> Result<(i64, i64), String> {
    let Some(raw) = position else {
        return Ok((-1, -1));
    };
    let mut parts = raw.split('/');
    let parse = |part: Option<&str>| part.and_then(|p| p.trim().parse::<i64>().ok());
    match (parse(parts.next()), parse(parts.next())) {
        (Some(dg), Some(vg)) => Ok((dg, vg)),
        _ => Err(raw.to_string()),
    }
}
