// integration tests for the check command

use crate::common::*;

#[test]
fn test_check_lists_groups_in_order() {
    let test_dir = create_test_dir(&unique_test_name("check"));

    let output = run_tagsel(
        &test_dir,
        &[
            "--no-json", "check", "-a", "slow,speed=fast,", "-a", "!db", "-A", "x or y",
        ],
    );
    cleanup_test_dir(&test_dir);

    assert!(output.status.success());
    // expression groups come first
    assert_eq!(
        stdout_lines(&output),
        vec![
            "3 group(s), any of which selects a test:",
            "  1. eval(x or y)",
            "  2. slow,speed=fast",
            "  3. !db",
        ]
    );
}

#[test]
fn test_check_without_rules() {
    let test_dir = create_test_dir(&unique_test_name("check_empty"));

    let output = run_tagsel(&test_dir, &["--json", "check", "-a", ",,"]);
    cleanup_test_dir(&test_dir);

    let json = stdout_json(&output);
    assert_eq!(json["result"]["active"], false);
    assert_eq!(json["result"]["groups"], serde_json::json!([]));
}

#[test]
fn test_check_warns_about_unknown_keys() {
    let test_dir = create_test_dir(&unique_test_name("check_unknown"));
    let catalog = write_catalog(&test_dir);

    let output = run_tagsel(
        &test_dir,
        &[
            "--json",
            "check",
            "--catalog",
            catalog.to_str().unwrap(),
            "-a",
            "slw",
            "-A",
            "speed == 'fast'",
        ],
    );
    cleanup_test_dir(&test_dir);

    assert!(output.status.success());
    let json = stdout_json(&output);
    let warnings = json["result"]["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().contains("did you mean: slow"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no test carries attribute 'slw'"), "stderr: {}", stderr);
}

#[test]
fn test_check_strict_fails_with_suggestions() {
    let test_dir = create_test_dir(&unique_test_name("check_strict"));
    let catalog = write_catalog(&test_dir);

    let output = run_tagsel(
        &test_dir,
        &[
            "--json",
            "check",
            "--catalog",
            catalog.to_str().unwrap(),
            "--strict",
            "-a",
            "sped=fast",
        ],
    );
    cleanup_test_dir(&test_dir);

    assert_eq!(output.status.code(), Some(8));
    let json = stdout_json(&output);
    assert_eq!(json["error"]["code"], -32008);
    assert_eq!(json["error"]["data"]["suggestions"], serde_json::json!(["speed"]));
}

#[test]
fn test_check_reports_parse_position() {
    let test_dir = create_test_dir(&unique_test_name("check_parse"));

    let output = run_tagsel(&test_dir, &["--no-json", "check", "-A", "a = 1"]);
    cleanup_test_dir(&test_dir);

    assert_eq!(output.status.code(), Some(8));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("use '==' for comparison"), "stderr: {}", stderr);
    assert!(stderr.contains("at offset 2"), "stderr: {}", stderr);
}
