// Scrape pipeline: fetch the controller tree, classify, extract, correlate drives.
// Extraction is a pure pass over the response; only the two fetches touch the network.

mod classify;
mod common;
mod hba;
mod physical;
mod raid;

pub use classify::{HBA_DRIVER, RAID_DRIVERS, classify};
pub use hba::HbaExtractor;
pub use physical::{DriveSlot, correlate, speed_gbps};
pub use raid::RaidExtractor;

use serde_json::Value;

use crate::models::{
    Collection, ControllerFamily, ControllerReport, Diagnostic, PhysicalDriveReport,
};
use crate::perccli::schema::{Lenient, PdEntry};
use crate::perccli::{FetchError, Perccli, Response};

/// Drive summary rows whose details live in the second (`/cALL/eALL/sALL`) fetch.
#[derive(Debug, Clone)]
pub struct PendingDrives {
    pub controller: u32,
    pub drives: Vec<PdEntry>,
}

/// Family-specific extraction. Implementations fill `report` as far as the block
/// allows and record every skipped field in `diagnostics`.
pub trait FamilyExtractor {
    fn extract(
        &self,
        block: &Value,
        report: &mut ControllerReport,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<PendingDrives>;
}

pub fn family_extractor(family: ControllerFamily) -> Option<&'static dyn FamilyExtractor> {
    match family {
        ControllerFamily::Raid => Some(&RaidExtractor),
        ControllerFamily::Hba => Some(&HbaExtractor),
        ControllerFamily::Unrecognized => None,
    }
}

/// Extract every controller of a `/cALL show all J` response. Returns the partial
/// collection and the drives still waiting for detail data.
pub fn extract_controllers(response: &Response) -> (Collection, Vec<PendingDrives>) {
    let mut collection = Collection::default();
    let mut pending = Vec::new();

    for (position, entry) in response.controllers().iter().enumerate() {
        let scope = format!("controllers[{}]", position);
        let Some(block) = entry.get("Response Data") else {
            collection
                .diagnostics
                .push(Diagnostic::new(scope, "Response Data", "missing"));
            continue;
        };
        let Some((mut report, driver)) =
            common::extract(block, &scope, &mut collection.diagnostics)
        else {
            continue;
        };

        report.family = classify(&driver);
        match family_extractor(report.family) {
            Some(extractor) => {
                let drives = extractor.extract(block, &mut report, &mut collection.diagnostics);
                pending.extend(drives);
            }
            None => tracing::debug!(
                controller = report.index,
                driver = %driver,
                "unrecognized driver; exporting identity only"
            ),
        }
        collection.controllers.push(report);
    }

    (collection, pending)
}

/// Correlate pending drives against a `/cALL/eALL/sALL show all J` response.
/// Each controller's block is found at its index in the `Controllers` array.
pub fn attach_drive_details(
    collection: &mut Collection,
    pending: Vec<PendingDrives>,
    details: &Response,
) {
    for p in pending {
        let scope = format!("controller {}", p.controller);
        let Some(report) = collection
            .controllers
            .iter_mut()
            .find(|c| c.index == p.controller)
        else {
            continue;
        };
        let Some(drive_info) = details
            .response_data(p.controller as usize)
            .and_then(Value::as_object)
        else {
            collection.diagnostics.push(Diagnostic::new(
                scope,
                "drive details",
                "no Response Data at this controller index",
            ));
            continue;
        };
        for entry in &p.drives {
            if let Some(drive) =
                correlate(entry, drive_info, p.controller, &mut collection.diagnostics)
            {
                push_drive(report, drive, &mut collection.diagnostics);
            }
        }
    }
}

/// A field decoded on its own; a malformed value is recorded and skipped.
pub(crate) fn parsed<T>(
    value: Lenient<T>,
    scope: &str,
    field: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<T> {
    match value.0 {
        Ok(v) => Some(v),
        Err(reason) => {
            diagnostics.push(Diagnostic::new(scope, field, reason));
            None
        }
    }
}

/// Like [`parsed`], and also records a field the tool left out.
pub(crate) fn required<T>(
    value: Option<Lenient<T>>,
    scope: &str,
    field: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<T> {
    match value {
        Some(v) => parsed(v, scope, field, diagnostics),
        None => {
            diagnostics.push(Diagnostic::new(scope, field, "missing"));
            None
        }
    }
}

/// Add a drive unless its (enclosure, slot) is already reported for this controller.
pub(crate) fn push_drive(
    report: &mut ControllerReport,
    drive: PhysicalDriveReport,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let duplicate = report
        .physical_drives
        .iter()
        .any(|d| d.enclosure == drive.enclosure && d.slot == drive.slot);
    if duplicate {
        diagnostics.push(Diagnostic::new(
            format!("controller {}", report.index),
            format!("drive {}:{}", drive.enclosure, drive.slot),
            "duplicate enclosure/slot",
        ));
        return;
    }
    report.physical_drives.push(drive);
}

/// One scrape. Transport and envelope failures abort it; everything else is
/// recorded as a diagnostic and the rest of the data is still returned.
/// The drive detail fetch happens at most once, and only when a RAID controller
/// reported drives.
pub async fn collect(perccli: &Perccli<'_>) -> Result<Collection, FetchError> {
    let response = perccli.show_controllers().await?;
    let (mut collection, pending) = extract_controllers(&response);

    if !pending.is_empty() {
        let details = perccli.show_drives().await?;
        attach_drive_details(&mut collection, pending, &details);
    }

    for d in &collection.diagnostics {
        tracing::warn!(
            host = perccli.host(),
            scope = %d.scope,
            field = %d.field,
            reason = %d.reason,
            "skipped field"
        );
    }
    tracing::info!(
        host = perccli.host(),
        controllers = collection.controllers.len(),
        skipped = collection.diagnostics.len(),
        "scrape complete"
    );
    Ok(collection)
}
