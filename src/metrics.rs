// Prometheus metric families for one scrape. A fresh registry per request, so
// series from a previous scrape (or another target) never leak into the response.

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

use crate::models::{BackupUnitKind, Collection, ControllerFamily, ControllerHealth};

pub const NAMESPACE: &str = "megaraid";

const CONTROLLER: &[&str] = &["controller"];
const DRIVE: &[&str] = &["controller", "enclosure", "slot"];

pub struct ExporterMetrics {
    registry: Registry,
    controller_info: GaugeVec,
    temperature: GaugeVec,
    healthy: GaugeVec,
    degraded: GaugeVec,
    failed: GaugeVec,
    time_difference: GaugeVec,
    battery_backup_healthy: GaugeVec,
    bbu_temperature: GaugeVec,
    cv_temperature: GaugeVec,
    scheduled_patrol_read: GaugeVec,
    ports: GaugeVec,
    physical_drives: GaugeVec,
    drive_groups: GaugeVec,
    virtual_drives: GaugeVec,
    vd_info: GaugeVec,
    pd_shield_counter: GaugeVec,
    pd_media_errors: GaugeVec,
    pd_other_errors: GaugeVec,
    pd_predictive_errors: GaugeVec,
    pd_smart_alerted: GaugeVec,
    pd_link_speed: GaugeVec,
    pd_device_speed: GaugeVec,
    pd_commissioned_spare: GaugeVec,
    pd_emergency_spare: GaugeVec,
    pd_info: GaugeVec,
}

fn gauge_vec(
    registry: &Registry,
    name: &str,
    help: &str,
    labels: &[&str],
) -> Result<GaugeVec, prometheus::Error> {
    let gauge = GaugeVec::new(Opts::new(name, help).namespace(NAMESPACE), labels)?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

impl ExporterMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let r = &registry;
        Ok(Self {
            controller_info: gauge_vec(
                r,
                "controller_info",
                "MegaRAID controller info",
                &["controller", "model", "serial", "fwversion"],
            )?,
            temperature: gauge_vec(
                r,
                "temperature",
                "MegaRAID controller temperature",
                CONTROLLER,
            )?,
            healthy: gauge_vec(r, "healthy", "MegaRAID controller healthy", CONTROLLER)?,
            degraded: gauge_vec(r, "degraded", "MegaRAID controller degraded", CONTROLLER)?,
            failed: gauge_vec(r, "failed", "MegaRAID controller failed", CONTROLLER)?,
            time_difference: gauge_vec(
                r,
                "time_difference",
                "MegaRAID time difference",
                CONTROLLER,
            )?,
            battery_backup_healthy: gauge_vec(
                r,
                "battery_backup_healthy",
                "MegaRAID battery backup healthy",
                CONTROLLER,
            )?,
            bbu_temperature: gauge_vec(
                r,
                "bbu_temperature",
                "MegaRAID battery backup temperature",
                &["controller", "bbuidx"],
            )?,
            cv_temperature: gauge_vec(
                r,
                "cv_temperature",
                "MegaRAID CacheVault temperature",
                &["controller", "cvidx"],
            )?,
            scheduled_patrol_read: gauge_vec(
                r,
                "scheduled_patrol_read",
                "MegaRAID scheduled patrol read",
                CONTROLLER,
            )?,
            ports: gauge_vec(r, "ports", "MegaRAID ports", CONTROLLER)?,
            physical_drives: gauge_vec(
                r,
                "physical_drives",
                "MegaRAID physical drives",
                CONTROLLER,
            )?,
            drive_groups: gauge_vec(r, "drive_groups", "MegaRAID drive groups", CONTROLLER)?,
            virtual_drives: gauge_vec(
                r,
                "virtual_drives",
                "MegaRAID virtual drives",
                CONTROLLER,
            )?,
            vd_info: gauge_vec(
                r,
                "vd_info",
                "MegaRAID virtual drive info",
                &["controller", "DG", "VG", "name", "cache", "type", "state"],
            )?,
            pd_shield_counter: gauge_vec(
                r,
                "pd_shield_counter",
                "MegaRAID physical drive shield counter",
                DRIVE,
            )?,
            pd_media_errors: gauge_vec(
                r,
                "pd_media_errors",
                "MegaRAID physical drive media errors",
                DRIVE,
            )?,
            pd_other_errors: gauge_vec(
                r,
                "pd_other_errors",
                "MegaRAID physical drive other errors",
                DRIVE,
            )?,
            pd_predictive_errors: gauge_vec(
                r,
                "pd_predictive_errors",
                "MegaRAID physical drive predictive errors",
                DRIVE,
            )?,
            pd_smart_alerted: gauge_vec(
                r,
                "pd_smart_alerted",
                "MegaRAID physical drive SMART alerted",
                DRIVE,
            )?,
            pd_link_speed: gauge_vec(
                r,
                "pd_link_speed_gbps",
                "MegaRAID physical drive link speed in Gbps",
                DRIVE,
            )?,
            pd_device_speed: gauge_vec(
                r,
                "pd_device_speed_gbps",
                "MegaRAID physical drive device speed in Gbps",
                DRIVE,
            )?,
            pd_commissioned_spare: gauge_vec(
                r,
                "pd_commissioned_spare",
                "MegaRAID physical drive commissioned spare",
                DRIVE,
            )?,
            pd_emergency_spare: gauge_vec(
                r,
                "pd_emergency_spare",
                "MegaRAID physical drive emergency spare",
                DRIVE,
            )?,
            pd_info: gauge_vec(
                r,
                "pd_info",
                "MegaRAID physical drive info",
                &[
                    "controller",
                    "enclosure",
                    "slot",
                    "disk_id",
                    "interface",
                    "media",
                    "model",
                    "DG",
                    "state",
                    "firmware",
                    "serial",
                ],
            )?,
            registry,
        })
    }

    /// Write every value present in `collection`. Absent values produce no series.
    pub fn record(&self, collection: &Collection) {
        for c in &collection.controllers {
            let idx = c.index.to_string();
            let ctrl = [idx.as_str()];

            self.controller_info
                .with_label_values(&[
                    idx.as_str(),
                    c.model.as_str(),
                    c.serial.as_str(),
                    c.firmware.as_str(),
                ])
                .set(1.0);
            if let Some(t) = c.temperature {
                self.temperature.with_label_values(&ctrl).set(t);
            }

            match (c.family, c.health) {
                (ControllerFamily::Raid, Some(h)) => {
                    self.healthy
                        .with_label_values(&ctrl)
                        .set(flag(h == ControllerHealth::Healthy));
                    self.degraded
                        .with_label_values(&ctrl)
                        .set(flag(h == ControllerHealth::Degraded));
                    self.failed
                        .with_label_values(&ctrl)
                        .set(flag(h == ControllerHealth::Failed));
                }
                // HBAs only know OK / not OK
                (ControllerFamily::Hba, Some(h)) => {
                    self.healthy
                        .with_label_values(&ctrl)
                        .set(flag(h == ControllerHealth::Healthy));
                }
                _ => {}
            }

            let optional = [
                (&self.time_difference, c.clock_skew_secs.map(|s| s as f64)),
                (
                    &self.battery_backup_healthy,
                    c.battery_backup_healthy.map(flag),
                ),
                (
                    &self.scheduled_patrol_read,
                    c.scheduled_patrol_read.map(flag),
                ),
                (&self.ports, c.port_count),
                (&self.physical_drives, c.physical_drive_count),
                (&self.drive_groups, c.drive_group_count),
                (&self.virtual_drives, c.virtual_drive_count),
            ];
            for (gauge, value) in optional {
                if let Some(v) = value {
                    gauge.with_label_values(&ctrl).set(v);
                }
            }

            for unit in &c.backup_units {
                let Some(t) = unit.temperature else { continue };
                let gauge = match unit.kind {
                    BackupUnitKind::Bbu => &self.bbu_temperature,
                    BackupUnitKind::CacheVault => &self.cv_temperature,
                };
                let unit_idx = unit.index.to_string();
                gauge
                    .with_label_values(&[idx.as_str(), unit_idx.as_str()])
                    .set(t);
            }

            for vd in &c.virtual_drives {
                let (dg, vg) = (vd.drive_group.to_string(), vd.volume_group.to_string());
                self.vd_info
                    .with_label_values(&[
                        idx.as_str(),
                        dg.as_str(),
                        vg.as_str(),
                        vd.name.as_str(),
                        vd.cache.as_str(),
                        vd.raid_type.as_str(),
                        vd.state.as_str(),
                    ])
                    .set(1.0);
            }

            for pd in &c.physical_drives {
                let drive = [idx.as_str(), pd.enclosure.as_str(), pd.slot.as_str()];
                let optional = [
                    (&self.pd_shield_counter, pd.shield_counter),
                    (&self.pd_media_errors, pd.media_errors),
                    (&self.pd_other_errors, pd.other_errors),
                    (&self.pd_predictive_errors, pd.predictive_errors),
                    (&self.pd_smart_alerted, pd.smart_alert.map(flag)),
                    (&self.pd_link_speed, pd.link_speed_gbps.map(f64::from)),
                    (&self.pd_device_speed, pd.device_speed_gbps.map(f64::from)),
                    (&self.pd_commissioned_spare, pd.commissioned_spare.map(flag)),
                    (&self.pd_emergency_spare, pd.emergency_spare.map(flag)),
                ];
                for (gauge, value) in optional {
                    if let Some(v) = value {
                        gauge.with_label_values(&drive).set(v);
                    }
                }
                self.pd_info
                    .with_label_values(&[
                        idx.as_str(),
                        pd.enclosure.as_str(),
                        pd.slot.as_str(),
                        pd.device_id.as_str(),
                        pd.interface.as_str(),
                        pd.media.as_str(),
                        pd.model.as_str(),
                        pd.drive_group.as_str(),
                        pd.state.as_str(),
                        pd.firmware.as_str(),
                        pd.serial.as_str(),
                    ])
                    .set(1.0);
            }
        }
    }

    /// Text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}
