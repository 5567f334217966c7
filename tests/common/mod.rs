// Shared test helpers: a scripted perccli runner and response fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use perccli_exporter::perccli::{CommandRunner, FetchError, RemoteTarget};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

/// Returns canned stdout per argument string and records every call.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, args: &str, stdout: String) -> Self {
        self.responses.insert(args.to_string(), stdout);
        self
    }

    /// `(host, args)` of every invocation, in order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn args(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, a)| a).collect()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, target: &RemoteTarget, args: &str) -> Result<String, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((target.host.clone(), args.to_string()));
        self.responses
            .get(args)
            .cloned()
            .ok_or_else(|| FetchError::CommandFailed(format!("unscripted {}", args)))
    }
}

pub fn target() -> RemoteTarget {
    RemoteTarget {
        host: "esxi01.lan".into(),
        username: "root".into(),
        password: "calvin".into(),
    }
}

/// Wrap `Response Data` blocks in perccli's JSON envelope.
pub fn envelope(blocks: Vec<Value>) -> String {
    let controllers: Vec<Value> = blocks
        .into_iter()
        .enumerate()
        .map(|(i, block)| {
            json!({
                "Command Status": {
                    "CLI Version": "007.1910.0000.0000 Oct 08, 2021",
                    "Operating system": "VMkernel 7.0.3",
                    "Controller": i,
                    "Status": "Success",
                    "Description": "None",
                },
                "Response Data": block,
            })
        })
        .collect();
    json!({ "Controllers": controllers }).to_string()
}

pub fn failed_envelope() -> String {
    json!({
        "Controllers": [{
            "Command Status": {
                "Controller": 0,
                "Status": "Failure",
                "Description": "Controller 0 not found",
            }
        }]
    })
    .to_string()
}

pub fn pd_row(eid_slot: &str, device_id: u32) -> Value {
    json!({
        "EID:Slt": eid_slot,
        "DID": device_id,
        "State": "Onln",
        "DG": 0,
        "Size": "1.745 TB",
        "Intf": "SAS",
        "Med": "SSD",
        "SED": "N",
        "PI": "N",
        "SeSz": "512B",
        "Model": "PM1643a MZILT1T9HBJR0D3 ",
        "Sp": "U",
        "Type": "-",
    })
}

/// `Drive /cN/...` key, detail key, and the detail block for one drive.
pub fn drive_detail(id: &str, serial: &str) -> (String, Value) {
    (
        format!("{id} - Detailed Information"),
        json!({
            format!("{id} State"): {
                "Shield Counter": 0,
                "Media Error Count": 2,
                "Other Error Count": 0,
                "Drive Temperature": " 31C (87.80 F)",
                "Predictive Failure Count": 0,
                "S.M.A.R.T alert flagged by drive": "No",
            },
            format!("{id} Device attributes"): {
                "SN": format!("    {serial}"),
                "WWN": "5002538B0000AAAA",
                "Firmware Revision": "DSF8    ",
                "Link Speed": "12.0Gb/s",
                "Device Speed": "12.0Gb/s",
            },
            format!("{id} Policies/Settings"): {
                "Drive position": "DriveGroup:0, Span:0, Row:0",
                "Enclosure position": "1",
                "Commissioned Spare": "No",
                "Emergency Spare": "No",
            },
        }),
    )
}

pub fn raid_controller(index: u32, status: &str, physical_drives: &[Value]) -> Value {
    json!({
        "Basics": {
            "Controller": index,
            "Model": "PERC H740P Mini",
            "Serial Number": format!("54D00{index}"),
            "Current Controller Date/Time": "10/18/2026, 09:30:00",
            "Current System Date/time": "10/18/2026, 09:30:07",
        },
        "Version": {
            "Firmware Package Build": "51.16.0-4076",
            "Firmware Version": "5.160.02-3552",
            "Driver Name": "lsi_mr3",
        },
        "Status": {
            "Controller Status": status,
            "BBU Status": 0,
        },
        "HwCfg": {
            "Backend Port Count": 8,
            "ROC temperature(Degree Celsius)": 58,
        },
        "Scheduled Tasks": {
            "Patrol Read Reoccurrence": "168 hrs",
        },
        "Physical Drives": physical_drives.len(),
        "PD LIST": physical_drives,
        "Cachevault_Info": [{ "Model": "CVPM05", "State": "Optimal", "Temp": "27C" }],
    })
}

pub fn hba_controller(index: u32, drives: &[(&str, &str, &str)]) -> Value {
    let mut devices = serde_json::Map::new();
    for (id, eid_slot, serial) in drives {
        let mut row = pd_row(eid_slot, 0);
        row["State"] = json!("JBOD");
        row["DG"] = json!("-");
        devices.insert(id.to_string(), json!([row]));
        let (key, detail) = drive_detail(id, serial);
        devices.insert(key, detail);
    }
    json!({
        "Basics": {
            "Controller": index,
            "Model": "HBA330 Mini",
            "Serial Number": "29A0042",
        },
        "Version": {
            "Firmware Version": "16.17.01.00",
            "Driver Name": "mpt3sas",
        },
        "Status": { "Controller Status": "OK" },
        "HwCfg": { "Backend Port Count": 8 },
        "Physical Device Information": devices,
    })
}

/// `/cALL/eALL/sALL` response for the given per-controller drive details.
pub fn drive_details(controllers: Vec<Vec<(String, Value)>>) -> String {
    envelope(
        controllers
            .into_iter()
            .map(|details| {
                let map: serde_json::Map<String, Value> = details.into_iter().collect();
                Value::Object(map)
            })
            .collect(),
    )
}
