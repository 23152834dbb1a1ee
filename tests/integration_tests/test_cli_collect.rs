// integration tests for the collect command

use crate::common::*;

#[test]
fn test_collect_selected_attributes() {
    let test_dir = create_test_dir(&unique_test_name("collect"));
    let catalog = write_catalog(&test_dir);

    let output = run_tagsel(
        &test_dir,
        &["--no-json", "collect", catalog.to_str().unwrap(), "-a", "slow"],
    );
    cleanup_test_dir(&test_dir);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    // four-space indentation, prefix stripped, unit value wins over class
    assert!(stdout.contains("\n    \"api.TestUsers.test_create\": {\n"));
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "api.TestUsers.test_create": {
                "platform": ["Linux", "mac"],
                "slow": true,
                "speed": "fast"
            }
        })
    );
}

#[test]
fn test_collect_without_rules_covers_all_tests() {
    let test_dir = create_test_dir(&unique_test_name("collect_all"));
    let catalog = write_catalog(&test_dir);

    let output = run_tagsel(&test_dir, &["--no-json", "collect", catalog.to_str().unwrap()]);
    cleanup_test_dir(&test_dir);

    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    let tests = json.as_object().unwrap();
    let names: Vec<&str> = tests.keys().map(String::as_str).collect();

    // sorted keys; helper and setup_data are not tests
    assert_eq!(
        names,
        vec![
            "api.TestUsers.test_create",
            "api.TestUsers.test_delete",
            "m.test_fast",
            "m.test_plain",
        ]
    );
    assert_eq!(json["api.TestUsers.test_delete"]["slow"], false);
    assert_eq!(json["m.test_plain"], serde_json::json!({}));
}

#[test]
fn test_collect_with_custom_prefix() {
    let test_dir = create_test_dir(&unique_test_name("collect_prefix"));
    let catalog = test_dir.join("catalog.json");
    std::fs::write(
        &catalog,
        r#"{ "functions": [{ "module": "m", "name": "test_a",
             "attributes": { "qa_level": 2, "tst_slow": true } }] }"#,
    )
    .unwrap();

    let output = run_tagsel_with_env(
        &test_dir,
        &["--no-json", "collect", catalog.to_str().unwrap()],
        &[("TAGSEL_PREFIX", "qa")],
    );
    cleanup_test_dir(&test_dir);

    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(json, serde_json::json!({ "m.test_a": { "level": 2 } }));
}

#[test]
fn test_collect_json_envelope() {
    let test_dir = create_test_dir(&unique_test_name("collect_json"));
    let catalog = write_catalog(&test_dir);

    let output = run_tagsel(
        &test_dir,
        &["--json", "collect", catalog.to_str().unwrap(), "-a", "speed=fast"],
    );
    cleanup_test_dir(&test_dir);

    let json = stdout_json(&output);
    let tests = json["result"]["tests"].as_object().unwrap();
    assert_eq!(tests.len(), 2);
    assert_eq!(tests["m.test_fast"]["speed"], "fast");
}
