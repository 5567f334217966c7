// Controller family from the kernel driver name

use crate::models::ControllerFamily;

/// MegaRAID driver names: Linux `megaraid_sas` and the ESXi native `lsi_mr3`.
pub const RAID_DRIVERS: [&str; 2] = ["megaraid_sas", "lsi_mr3"];
/// Pass-through SAS3 HBA driver.
pub const HBA_DRIVER: &str = "mpt3sas";

pub fn classify(driver_name: &str) -> ControllerFamily {
    if RAID_DRIVERS.contains(&driver_name) {
        ControllerFamily::Raid
    } else if driver_name == HBA_DRIVER {
        ControllerFamily::Hba
    } else {
        ControllerFamily::Unrecognized
    }
}
