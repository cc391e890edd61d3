#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");
    let input = common::write_lines(&[common::message_line(
        "m1",
        "loan_repayplan",
        &[("principal", 1000), ("interest", 30)],
    )]);

    // 1. First run creates the voucher.
    let output1 = Command::new(cargo_bin!("voucher-engine"))
        .arg(input.path())
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output1.status.success());
    let first = common::parse_output(&output1.stdout);
    assert_eq!(first[0]["status"], 201);

    // 2. Second run against the same DB replays it.
    let output2 = Command::new(cargo_bin!("voucher-engine"))
        .arg(input.path())
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    assert!(output2.status.success());
    let second = common::parse_output(&output2.stdout);
    assert_eq!(second[0]["status"], 200);
    assert_eq!(
        second[0]["voucher"]["voucher_id"],
        first[0]["voucher"]["voucher_id"]
    );

    // 3. Regeneration replaces it, and the replacement is what later runs see.
    let output3 = Command::new(cargo_bin!("voucher-engine"))
        .arg(input.path())
        .arg("--db-path")
        .arg(&db_path)
        .arg("--regenerate")
        .output()
        .expect("Failed to execute command");
    let third = common::parse_output(&output3.stdout);
    assert_eq!(third[0]["status"], 201);
    assert_ne!(
        third[0]["voucher"]["voucher_id"],
        first[0]["voucher"]["voucher_id"]
    );

    let output4 = Command::new(cargo_bin!("voucher-engine"))
        .arg(input.path())
        .arg("--db-path")
        .arg(&db_path)
        .output()
        .expect("Failed to execute command");
    let fourth = common::parse_output(&output4.stdout);
    assert_eq!(
        fourth[0]["voucher"]["voucher_id"],
        third[0]["voucher"]["voucher_id"]
    );
}
