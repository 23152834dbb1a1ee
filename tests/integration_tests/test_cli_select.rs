// integration tests for the select command

use crate::common::*;

/// run `select` in text mode and return the selected names
fn select(args: &[&str]) -> Vec<String> {
    let test_dir = create_test_dir(&unique_test_name("select"));
    let catalog = write_catalog(&test_dir);

    let mut cmd_args = vec!["--no-json", "select", catalog.to_str().unwrap()];
    cmd_args.extend(args);
    let output = run_tagsel(&test_dir, &cmd_args);

    cleanup_test_dir(&test_dir);
    assert!(
        output.status.success(),
        "select failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    stdout_lines(&output)
}

#[test]
fn test_no_rules_selects_every_test() {
    assert_eq!(
        select(&[]),
        vec![
            "m.test_fast",
            "m.test_plain",
            "api.TestUsers.test_create",
            "api.TestUsers.test_delete",
        ]
    );
}

#[test]
fn test_bare_key_uses_class_fallback() {
    // test_delete sets slow=false itself, which hides the class value
    assert_eq!(select(&["-a", "slow"]), vec!["api.TestUsers.test_create"]);
}

#[test]
fn test_negated_key() {
    assert_eq!(
        select(&["-a", "!slow"]),
        vec!["m.test_fast", "m.test_plain", "api.TestUsers.test_delete"]
    );
}

#[test]
fn test_value_match_ignores_case() {
    assert_eq!(
        select(&["-a", "speed=FAST"]),
        vec!["m.test_fast", "api.TestUsers.test_create"]
    );
}

#[test]
fn test_list_attribute_matches_any_element() {
    assert_eq!(
        select(&["-a", "platform=linux"]),
        vec!["api.TestUsers.test_create", "api.TestUsers.test_delete"]
    );
}

#[test]
fn test_rules_in_one_group_are_anded() {
    assert_eq!(
        select(&["--attr", "slow,speed=fast"]),
        vec!["api.TestUsers.test_create"]
    );
    assert!(select(&["--attr", "slow,!speed"]).is_empty());
}

#[test]
fn test_groups_are_ored() {
    assert_eq!(
        select(&["-a", "platform=mac,!slow", "-a", "speed=fast"]),
        vec![
            "m.test_fast",
            "api.TestUsers.test_create",
            "api.TestUsers.test_delete",
        ]
    );
}

#[test]
fn test_eval_attr_expression() {
    assert_eq!(
        select(&["-A", "platform and not slow"]),
        vec!["api.TestUsers.test_delete"]
    );
    assert_eq!(
        select(&["--eval-attr", "speed == 'fast' and not slow"]),
        vec!["m.test_fast"]
    );
}

#[test]
fn test_trailing_comma_is_ignored() {
    assert_eq!(select(&["-a", "slow,"]), select(&["-a", "slow"]));
}

#[test]
fn test_json_output() {
    let test_dir = create_test_dir(&unique_test_name("select_json"));
    let catalog = write_catalog(&test_dir);

    let output = run_tagsel(
        &test_dir,
        &["--json", "select", catalog.to_str().unwrap(), "-a", "slow"],
    );
    cleanup_test_dir(&test_dir);

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["result"]["active"], true);
    assert_eq!(json["result"]["total"], 4);
    assert_eq!(
        json["result"]["selected"],
        serde_json::json!(["api.TestUsers.test_create"])
    );
}

#[test]
fn test_json_output_inactive() {
    let test_dir = create_test_dir(&unique_test_name("select_inactive"));
    let catalog = write_catalog(&test_dir);

    let output = run_tagsel(&test_dir, &["--json", "select", catalog.to_str().unwrap()]);
    cleanup_test_dir(&test_dir);

    let json = stdout_json(&output);
    assert_eq!(json["result"]["active"], false);
    assert_eq!(json["result"]["selected"].as_array().unwrap().len(), 4);
}

#[test]
fn test_quiet_prints_nothing() {
    let test_dir = create_test_dir(&unique_test_name("select_quiet"));
    let catalog = write_catalog(&test_dir);

    let output = run_tagsel(&test_dir, &["-q", "select", catalog.to_str().unwrap()]);
    cleanup_test_dir(&test_dir);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_invalid_expression_exits_with_invalid_rules() {
    let test_dir = create_test_dir(&unique_test_name("select_bad_expr"));
    let catalog = write_catalog(&test_dir);

    let output = run_tagsel(
        &test_dir,
        &["--no-json", "select", catalog.to_str().unwrap(), "-A", "slow and"],
    );
    cleanup_test_dir(&test_dir);

    assert_eq!(output.status.code(), Some(8));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid expression"), "stderr: {}", stderr);
}

#[test]
fn test_empty_key_exits_with_invalid_rules() {
    let test_dir = create_test_dir(&unique_test_name("select_empty_key"));
    let catalog = write_catalog(&test_dir);

    let output = run_tagsel(
        &test_dir,
        &["--no-json", "select", catalog.to_str().unwrap(), "-a", "=fast"],
    );
    cleanup_test_dir(&test_dir);

    assert_eq!(output.status.code(), Some(8));
}

#[test]
fn test_evaluation_error_exits_with_eval_error() {
    let test_dir = create_test_dir(&unique_test_name("select_eval_error"));
    let catalog = write_catalog(&test_dir);

    let output = run_tagsel(
        &test_dir,
        &["--json", "select", catalog.to_str().unwrap(), "-A", "speed > 1"],
    );
    cleanup_test_dir(&test_dir);

    assert_eq!(output.status.code(), Some(9));
    let json = stdout_json(&output);
    assert_eq!(json["error"]["code"], -32009);
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("cannot apply '>'"));
}

#[test]
fn test_missing_catalog_is_an_error() {
    let test_dir = create_test_dir(&unique_test_name("select_missing"));
    let missing = test_dir.join("nope.json");

    let output = run_tagsel(&test_dir, &["--no-json", "select", missing.to_str().unwrap()]);
    cleanup_test_dir(&test_dir);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read catalog"), "stderr: {}", stderr);
}

#[test]
fn test_empty_prefix_is_invalid() {
    let test_dir = create_test_dir(&unique_test_name("select_empty_prefix"));
    let catalog = write_catalog(&test_dir);

    let output = run_tagsel(
        &test_dir,
        &["--no-json", "--prefix", "", "select", catalog.to_str().unwrap()],
    );
    cleanup_test_dir(&test_dir);

    assert_eq!(output.status.code(), Some(4));
}
