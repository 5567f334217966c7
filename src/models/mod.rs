// Normalized controller reports, built fresh for every scrape

mod controller;
mod diagnostic;
mod drive;

pub use controller::{
    BackupUnitKind, BackupUnitReport, ControllerFamily, ControllerHealth, ControllerReport,
};
pub use diagnostic::{Collection, Diagnostic};
pub use drive::{PhysicalDriveReport, VirtualDriveReport};
