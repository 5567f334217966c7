// Virtual and physical drive reports

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDriveReport {
    /// -1 when the tool gave no DG/VD position.
    pub drive_group: i64,
    /// -1 when the tool gave no DG/VD position.
    pub volume_group: i64,
    pub name: String,
    pub cache: String,
    pub raid_type: String,
    pub state: String,
}

/// Identity is (controller, enclosure, slot). `enclosure` is empty for drives
/// attached without an enclosure.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalDriveReport {
    pub controller: u32,
    pub enclosure: String,
    pub slot: String,
    pub device_id: String,
    pub interface: String,
    pub media: String,
    pub model: String,
    pub drive_group: String,
    pub state: String,
    pub firmware: String,
    pub serial: String,
    pub shield_counter: Option<f64>,
    pub media_errors: Option<f64>,
    pub other_errors: Option<f64>,
    pub predictive_errors: Option<f64>,
    pub smart_alert: Option<bool>,
    pub link_speed_gbps: Option<u32>,
    pub device_speed_gbps: Option<u32>,
    pub commissioned_spare: Option<bool>,
    pub emergency_spare: Option<bool>,
}
