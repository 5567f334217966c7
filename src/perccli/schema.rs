// Wire schema for `perccli ... J` responses.
// Field names follow the tool's JSON keys; anything the tool may leave out is an Option.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

/// A field decoded on its own. A malformed value keeps its error text instead of
/// failing the enclosing block.
#[derive(Debug, Clone, PartialEq)]
pub struct Lenient<T>(pub Result<T, String>);

impl<'de, T: DeserializeOwned> Deserialize<'de> for Lenient<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Lenient(T::deserialize(value).map_err(|e| e.to_string())))
    }
}

/// A count or reading printed either as a JSON number or as numeric text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number(pub f64);

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        opt_number(deserializer)?
            .map(Number)
            .ok_or_else(|| de::Error::custom("expected a number, got null"))
    }
}

/// Identity and driver, present for every controller family.
#[derive(Debug, Clone, Deserialize)]
pub struct CommonBlock {
    #[serde(rename = "Basics")]
    pub basics: Basics,
    #[serde(rename = "Version")]
    pub version: Version,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Basics {
    #[serde(rename = "Controller")]
    pub controller: u32,
    #[serde(rename = "Model", deserialize_with = "scalar_string")]
    pub model: String,
    #[serde(rename = "Serial Number", deserialize_with = "scalar_string")]
    pub serial_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Version {
    #[serde(rename = "Firmware Version", deserialize_with = "scalar_string")]
    pub firmware_version: String,
    #[serde(rename = "Driver Name")]
    pub driver_name: String,
}

/// ROC temperature. Firmware generations spell the key differently; boards without
/// the sensor have neither.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RocTemperature {
    #[serde(
        rename = "ROC temperature(Degree Celcius)",
        default,
        deserialize_with = "opt_number"
    )]
    pub celcius: Option<f64>,
    #[serde(
        rename = "ROC temperature(Degree Celsius)",
        default,
        deserialize_with = "opt_number"
    )]
    pub celsius: Option<f64>,
}

impl RocTemperature {
    pub fn value(&self) -> Option<f64> {
        self.celcius.or(self.celsius)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortConfig {
    #[serde(rename = "Backend Port Count")]
    pub backend_port_count: Option<Lenient<Number>>,
}

/// `BBU Status` is a numeric code, or the text `NA` when no unit is fitted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BbuStatus {
    Code(i64),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RaidStatus {
    #[serde(rename = "Controller Status")]
    pub controller_status: Option<Lenient<String>>,
    #[serde(rename = "BBU Status")]
    pub bbu_status: Option<Lenient<BbuStatus>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduledTasks {
    #[serde(rename = "Patrol Read Reoccurrence")]
    pub patrol_read_reoccurrence: Option<Lenient<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackupUnitEntry {
    #[serde(rename = "Temp", default, deserialize_with = "opt_scalar_string")]
    pub temp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VdEntry {
    #[serde(rename = "DG/VD")]
    pub position: Option<String>,
    #[serde(rename = "Name", deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(rename = "Cache", deserialize_with = "scalar_string")]
    pub cache: String,
    #[serde(rename = "TYPE", deserialize_with = "scalar_string")]
    pub raid_type: String,
    #[serde(rename = "State", deserialize_with = "scalar_string")]
    pub state: String,
}

/// One row of a `PD LIST`, or the first element of an HBA basic drive entry.
#[derive(Debug, Clone, Deserialize)]
pub struct PdEntry {
    #[serde(rename = "EID:Slt")]
    pub eid_slot: String,
    #[serde(rename = "DID", deserialize_with = "scalar_string")]
    pub device_id: String,
    #[serde(rename = "Intf", deserialize_with = "scalar_string")]
    pub interface: String,
    #[serde(rename = "Med", deserialize_with = "scalar_string")]
    pub media: String,
    #[serde(rename = "Model", deserialize_with = "scalar_string")]
    pub model: String,
    #[serde(rename = "DG", deserialize_with = "scalar_string")]
    pub drive_group: String,
    #[serde(rename = "State", deserialize_with = "scalar_string")]
    pub state: String,
}

/// Full RAID (MegaRAID) controller block. Every field decodes on its own, so one
/// malformed value or list row only costs that value or row.
#[derive(Debug, Clone, Deserialize)]
pub struct RaidBlock {
    #[serde(rename = "Basics", default)]
    pub basics: RaidBasics,
    #[serde(rename = "Status")]
    pub status: Option<RaidStatus>,
    #[serde(rename = "HwCfg")]
    pub hw_cfg: Option<PortConfig>,
    #[serde(rename = "Scheduled Tasks")]
    pub scheduled_tasks: Option<ScheduledTasks>,
    #[serde(rename = "Cachevault_Info", default)]
    pub cachevault_info: Vec<Lenient<BackupUnitEntry>>,
    #[serde(rename = "BBU_Info", default)]
    pub bbu_info: Vec<Lenient<BackupUnitEntry>>,
    /// Present only when drive groups are configured.
    #[serde(rename = "Drive Groups")]
    pub drive_groups: Option<Lenient<Number>>,
    #[serde(rename = "Virtual Drives")]
    pub virtual_drives: Option<Lenient<Number>>,
    #[serde(rename = "VD LIST")]
    pub vd_list: Option<Vec<Lenient<VdEntry>>>,
    #[serde(rename = "Physical Drives")]
    pub physical_drives: Option<Lenient<Number>>,
    #[serde(rename = "PD LIST")]
    pub pd_list: Option<Vec<Lenient<PdEntry>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RaidBasics {
    #[serde(rename = "Current Controller Date/Time")]
    pub controller_time: Option<Lenient<String>>,
    #[serde(rename = "Current System Date/time")]
    pub system_time: Option<Lenient<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HbaStatus {
    #[serde(rename = "Controller Status")]
    pub controller_status: Option<Lenient<String>>,
}

/// Pass-through HBA (mpt3sas) controller block.
#[derive(Debug, Clone, Deserialize)]
pub struct HbaBlock {
    #[serde(rename = "Status")]
    pub status: Option<HbaStatus>,
    #[serde(rename = "HwCfg")]
    pub hw_cfg: Option<PortConfig>,
    #[serde(rename = "Physical Device Information")]
    pub physical_devices: Option<Lenient<Map<String, Value>>>,
}

/// `Drive /cN/eE/sS State`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriveState {
    #[serde(rename = "Shield Counter", default, deserialize_with = "opt_number")]
    pub shield_counter: Option<f64>,
    #[serde(rename = "Media Error Count", default, deserialize_with = "opt_number")]
    pub media_error_count: Option<f64>,
    #[serde(rename = "Other Error Count", default, deserialize_with = "opt_number")]
    pub other_error_count: Option<f64>,
    #[serde(
        rename = "Predictive Failure Count",
        default,
        deserialize_with = "opt_number"
    )]
    pub predictive_failure_count: Option<f64>,
    #[serde(rename = "S.M.A.R.T alert flagged by drive")]
    pub smart_alert: Option<String>,
}

/// `Drive /cN/eE/sS Device attributes`
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceAttributes {
    #[serde(rename = "SN", deserialize_with = "scalar_string")]
    pub serial_number: String,
    #[serde(rename = "Firmware Revision", deserialize_with = "scalar_string")]
    pub firmware_revision: String,
    #[serde(rename = "Link Speed")]
    pub link_speed: Option<String>,
    #[serde(rename = "Device Speed")]
    pub device_speed: Option<String>,
}

/// `Drive /cN/eE/sS Policies/Settings`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriveSettings {
    #[serde(rename = "Commissioned Spare")]
    pub commissioned_spare: Option<String>,
    #[serde(rename = "Emergency Spare")]
    pub emergency_spare: Option<String>,
}

/// Any JSON scalar as text; the tool prints some ids as numbers on one firmware and
/// strings on another.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!("expected a scalar, got {}", other))),
    }
}

fn opt_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a scalar, got {}",
            other
        ))),
    }
}

/// Numbers, or strings holding a number.
fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("number out of range: {}", n))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected a number, got {:?}", s))),
        Some(other) => Err(de::Error::custom(format!(
            "expected a number, got {}",
            other
        ))),
    }
}
