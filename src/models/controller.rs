// Controller-level reports

use super::{PhysicalDriveReport, VirtualDriveReport};

/// Controller family, decided once from the driver name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerFamily {
    Raid,
    Hba,
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerHealth {
    Healthy,
    Degraded,
    Failed,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupUnitKind {
    Bbu,
    CacheVault,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackupUnitReport {
    pub kind: BackupUnitKind,
    /// Position within the controller's BBU or CacheVault list.
    pub index: usize,
    pub temperature: Option<f64>,
}

/// One physical controller. Optional fields stay `None` when the tool omitted them;
/// the metric sink skips those instead of writing zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerReport {
    pub index: u32,
    pub model: String,
    pub serial: String,
    pub firmware: String,
    pub family: ControllerFamily,
    pub temperature: Option<f64>,
    pub health: Option<ControllerHealth>,
    pub battery_backup_healthy: Option<bool>,
    pub port_count: Option<f64>,
    pub physical_drive_count: Option<f64>,
    pub drive_group_count: Option<f64>,
    pub virtual_drive_count: Option<f64>,
    pub scheduled_patrol_read: Option<bool>,
    /// Seconds between the host clock and the controller clock (RAID only).
    pub clock_skew_secs: Option<i64>,
    pub backup_units: Vec<BackupUnitReport>,
    pub virtual_drives: Vec<VirtualDriveReport>,
    pub physical_drives: Vec<PhysicalDriveReport>,
}

impl ControllerReport {
    /// Identity-only report; family extractors fill in the rest.
    pub fn new(index: u32, model: String, serial: String, firmware: String) -> Self {
        Self {
            index,
            model,
            serial,
            firmware,
            family: ControllerFamily::Unrecognized,
            temperature: None,
            health: None,
            battery_backup_healthy: None,
            port_count: None,
            physical_drive_count: None,
            drive_group_count: None,
            virtual_drive_count: None,
            scheduled_patrol_read: None,
            clock_skew_secs: None,
            backup_units: Vec::new(),
            virtual_drives: Vec::new(),
            physical_drives: Vec::new(),
        }
    }
}
