// Collector scenarios against a scripted perccli

mod common;

use common::*;
use perccli_exporter::collector::collect;
use perccli_exporter::models::{ControllerFamily, ControllerHealth};
use perccli_exporter::perccli::{FetchError, Perccli, SHOW_CONTROLLERS, SHOW_DRIVES};
use serde_json::json;

#[tokio::test]
async fn optimal_raid_without_drives_skips_detail_fetch() {
    let mut block = raid_controller(0, "Optimal", &[]);
    block.as_object_mut().unwrap().remove("PD LIST");
    let runner = ScriptedRunner::new().respond(SHOW_CONTROLLERS, envelope(vec![block]));
    let target = target();

    let collection = collect(&Perccli::new(&runner, &target)).await.unwrap();

    assert_eq!(runner.args(), vec![SHOW_CONTROLLERS.to_string()]);
    assert_eq!(collection.controllers.len(), 1);
    let c = &collection.controllers[0];
    assert_eq!(c.family, ControllerFamily::Raid);
    assert_eq!(c.health, Some(ControllerHealth::Healthy));
    assert_eq!(c.model, "PERC H740P Mini");
    assert_eq!(c.temperature, Some(58.0));
    assert_eq!(c.clock_skew_secs, Some(7));
    assert_eq!(c.physical_drive_count, Some(0.0));
    assert_eq!(c.drive_group_count, None);
    assert!(c.virtual_drives.is_empty());
    assert!(c.physical_drives.is_empty());
}

#[tokio::test]
async fn raid_drives_are_correlated_with_detail_fetch() {
    let block = raid_controller(0, "Optimal", &[pd_row("252:0", 10), pd_row(" :1", 11)]);
    let details = drive_details(vec![vec![
        drive_detail("Drive /c0/e252/s0", "S3SANA0K100001"),
        drive_detail("Drive /c0/s1", "S3SANA0K100002"),
    ]]);
    let runner = ScriptedRunner::new()
        .respond(SHOW_CONTROLLERS, envelope(vec![block]))
        .respond(SHOW_DRIVES, details);
    let target = target();

    let collection = collect(&Perccli::new(&runner, &target)).await.unwrap();

    assert_eq!(
        runner.args(),
        vec![SHOW_CONTROLLERS.to_string(), SHOW_DRIVES.to_string()]
    );
    assert!(
        collection.diagnostics.is_empty(),
        "{:?}",
        collection.diagnostics
    );
    let drives = &collection.controllers[0].physical_drives;
    assert_eq!(drives.len(), 2);
    assert_eq!(drives[0].enclosure, "252");
    assert_eq!(drives[0].slot, "0");
    assert_eq!(drives[0].device_id, "10");
    assert_eq!(drives[0].serial, "S3SANA0K100001");
    assert_eq!(drives[0].firmware, "DSF8");
    assert_eq!(drives[0].model, "PM1643a MZILT1T9HBJR0D3");
    assert_eq!(drives[0].media_errors, Some(2.0));
    assert_eq!(drives[0].link_speed_gbps, Some(12));
    assert_eq!(drives[1].enclosure, "");
    assert_eq!(drives[1].slot, "1");
}

#[tokio::test]
async fn detail_fetch_is_shared_between_controllers() {
    let blocks = vec![
        raid_controller(0, "Optimal", &[pd_row("32:0", 0)]),
        raid_controller(1, "Degraded", &[pd_row("64:3", 0)]),
    ];
    let details = drive_details(vec![
        vec![drive_detail("Drive /c0/e32/s0", "A")],
        vec![drive_detail("Drive /c1/e64/s3", "B")],
    ]);
    let runner = ScriptedRunner::new()
        .respond(SHOW_CONTROLLERS, envelope(blocks))
        .respond(SHOW_DRIVES, details);
    let target = target();

    let collection = collect(&Perccli::new(&runner, &target)).await.unwrap();

    assert_eq!(runner.calls().len(), 2);
    assert_eq!(collection.controllers[0].physical_drives[0].serial, "A");
    assert_eq!(collection.controllers[1].physical_drives[0].serial, "B");
    assert_eq!(
        collection.controllers[1].health,
        Some(ControllerHealth::Degraded)
    );
}

#[tokio::test]
async fn hba_drives_come_from_single_fetch() {
    let block = hba_controller(
        0,
        &[
            ("Drive /c0/e1/s0", "1:0", "ZC10AAAA"),
            ("Drive /c0/e1/s1", "1:1", "ZC10BBBB"),
        ],
    );
    let runner = ScriptedRunner::new().respond(SHOW_CONTROLLERS, envelope(vec![block]));
    let target = target();

    let collection = collect(&Perccli::new(&runner, &target)).await.unwrap();

    assert_eq!(runner.args(), vec![SHOW_CONTROLLERS.to_string()]);
    let c = &collection.controllers[0];
    assert_eq!(c.family, ControllerFamily::Hba);
    assert_eq!(c.health, Some(ControllerHealth::Healthy));
    assert_eq!(c.physical_drive_count, Some(2.0));
    assert_eq!(c.physical_drives.len(), 2);
    assert_eq!(c.physical_drives[0].state, "JBOD");
}

#[tokio::test]
async fn unrecognized_driver_exports_identity_only() {
    let mut block = raid_controller(0, "Optimal", &[pd_row("32:0", 0)]);
    block["Version"]["Driver Name"] = json!("smartpqi");
    let runner = ScriptedRunner::new().respond(SHOW_CONTROLLERS, envelope(vec![block]));
    let target = target();

    let collection = collect(&Perccli::new(&runner, &target)).await.unwrap();

    assert_eq!(runner.calls().len(), 1);
    let c = &collection.controllers[0];
    assert_eq!(c.family, ControllerFamily::Unrecognized);
    assert_eq!(c.temperature, Some(58.0));
    assert_eq!(c.health, None);
    assert_eq!(c.physical_drive_count, None);
}

#[tokio::test]
async fn malformed_controller_does_not_blank_others() {
    let broken = json!({ "Version": { "Driver Name": "lsi_mr3" } });
    let good = hba_controller(1, &[]);
    let runner = ScriptedRunner::new().respond(SHOW_CONTROLLERS, envelope(vec![broken, good]));
    let target = target();

    let collection = collect(&Perccli::new(&runner, &target)).await.unwrap();

    assert_eq!(collection.controllers.len(), 1);
    assert_eq!(collection.controllers[0].index, 1);
    assert_eq!(collection.diagnostics.len(), 1);
    assert_eq!(collection.diagnostics[0].scope, "controllers[0]");
}

#[tokio::test]
async fn drive_without_details_is_dropped_alone() {
    let block = raid_controller(0, "Optimal", &[pd_row("252:0", 1), pd_row("252:1", 2)]);
    let details = drive_details(vec![vec![drive_detail("Drive /c0/e252/s1", "ONLY")]]);
    let runner = ScriptedRunner::new()
        .respond(SHOW_CONTROLLERS, envelope(vec![block]))
        .respond(SHOW_DRIVES, details);
    let target = target();

    let collection = collect(&Perccli::new(&runner, &target)).await.unwrap();

    let drives = &collection.controllers[0].physical_drives;
    assert_eq!(drives.len(), 1);
    assert_eq!(drives[0].serial, "ONLY");
    assert_eq!(collection.diagnostics.len(), 1);
    assert_eq!(collection.controllers[0].physical_drive_count, Some(2.0));
}

#[tokio::test]
async fn failed_command_status_aborts_scrape() {
    let runner = ScriptedRunner::new().respond(SHOW_CONTROLLERS, failed_envelope());
    let target = target();

    let err = collect(&Perccli::new(&runner, &target)).await.unwrap_err();

    assert!(matches!(err, FetchError::CommandFailed(s) if s == "Failure"));
}

#[tokio::test]
async fn failed_detail_fetch_aborts_scrape() {
    let block = raid_controller(0, "Optimal", &[pd_row("252:0", 1)]);
    let runner = ScriptedRunner::new()
        .respond(SHOW_CONTROLLERS, envelope(vec![block]))
        .respond(SHOW_DRIVES, "not json".into());
    let target = target();

    let err = collect(&Perccli::new(&runner, &target)).await.unwrap_err();

    assert!(matches!(err, FetchError::InvalidJson(_)));
}

#[tokio::test]
async fn duplicate_enclosure_slot_keeps_first_drive() {
    let block = raid_controller(0, "Optimal", &[pd_row("252:0", 10), pd_row("252:0", 11)]);
    let details = drive_details(vec![vec![drive_detail("Drive /c0/e252/s0", "FIRST")]]);
    let runner = ScriptedRunner::new()
        .respond(SHOW_CONTROLLERS, envelope(vec![block]))
        .respond(SHOW_DRIVES, details);
    let target = target();

    let collection = collect(&Perccli::new(&runner, &target)).await.unwrap();

    let drives = &collection.controllers[0].physical_drives;
    assert_eq!(drives.len(), 1);
    assert_eq!(drives[0].device_id, "10");
    assert_eq!(drives[0].serial, "FIRST");
    assert_eq!(collection.diagnostics.len(), 1);
    let diag = &collection.diagnostics[0];
    assert_eq!(diag.scope, "controller 0");
    assert_eq!(diag.field, "drive 252:0");
    assert_eq!(diag.reason, "duplicate enclosure/slot");
}

#[tokio::test]
async fn bad_pd_row_keeps_rest_of_controller() {
    let mut broken = pd_row("252:1", 11);
    broken.as_object_mut().unwrap().remove("Model");
    let block = raid_controller(0, "Degraded", &[pd_row("252:0", 10), broken]);
    let details = drive_details(vec![vec![
        drive_detail("Drive /c0/e252/s0", "GOOD"),
        drive_detail("Drive /c0/e252/s1", "UNLISTED"),
    ]]);
    let runner = ScriptedRunner::new()
        .respond(SHOW_CONTROLLERS, envelope(vec![block]))
        .respond(SHOW_DRIVES, details);
    let target = target();

    let collection = collect(&Perccli::new(&runner, &target)).await.unwrap();

    let c = &collection.controllers[0];
    assert_eq!(c.health, Some(ControllerHealth::Degraded));
    assert_eq!(c.port_count, Some(8.0));
    assert_eq!(c.clock_skew_secs, Some(7));
    assert_eq!(c.physical_drive_count, Some(2.0));
    assert_eq!(c.physical_drives.len(), 1);
    assert_eq!(c.physical_drives[0].serial, "GOOD");
    assert_eq!(collection.diagnostics.len(), 1);
    assert_eq!(collection.diagnostics[0].field, "PD LIST[1]");
}
