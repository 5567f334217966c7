// Family-independent controller facts: identity, firmware, ROC temperature

use serde::Deserialize;
use serde_json::Value;

use crate::models::{ControllerReport, Diagnostic};
use crate::perccli::schema::{CommonBlock, RocTemperature};

/// Identity report plus the driver name used for classification.
/// `None` when the block has no usable identity; the controller is then skipped.
pub(super) fn extract(
    block: &Value,
    scope: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<(ControllerReport, String)> {
    let common = match CommonBlock::deserialize(block) {
        Ok(c) => c,
        Err(e) => {
            diagnostics.push(Diagnostic::new(scope, "Basics/Version", e));
            return None;
        }
    };

    let mut report = ControllerReport::new(
        common.basics.controller,
        common.basics.model,
        common.basics.serial_number,
        common.version.firmware_version,
    );

    if let Some(hw_cfg) = block.get("HwCfg") {
        match RocTemperature::deserialize(hw_cfg) {
            Ok(t) => report.temperature = t.value(),
            Err(e) => diagnostics.push(Diagnostic::new(
                format!("controller {}", report.index),
                "HwCfg/ROC temperature",
                e,
            )),
        }
    }

    Some((report, common.version.driver_name))
}
