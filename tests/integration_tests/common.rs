// shared utilities for integration tests

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};

/// environment variables the binary reads; cleared for every run
const TAGSEL_ENV_VARS: &[&str] = &[
    "TAGSEL_CONFIG",
    "TAGSEL_PREFIX",
    "TAGSEL_ATTR",
    "TAGSEL_EVAL_ATTR",
    "TAGSEL_LOG",
];

// counter for unique test directory names
static TEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// create a unique test directory name
pub fn unique_test_name(prefix: &str) -> String {
    let count = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let thread_id = std::thread::current().id();
    format!("{}_{:?}_{}", prefix, thread_id, count)
}

/// create a temporary directory for a test
pub fn create_test_dir(name: &str) -> PathBuf {
    let base = env::temp_dir().join("tagsel_integration_tests");
    let dir = base.join(name);

    // clean up if exists
    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }

    fs::create_dir_all(&dir).expect("Failed to create test directory");
    dir
}

/// clean up a test directory
pub fn cleanup_test_dir(path: &Path) {
    if path.exists() {
        fs::remove_dir_all(path).ok();
    }
}

/// get path to the built tagsel binary
pub fn tagsel_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tagsel"))
}

/// a catalog exercising class fallback, lists and non-test names
///
/// collected tests, in order:
/// - `m.test_fast`              speed=fast
/// - `m.test_plain`             (nothing)
/// - `api.TestUsers.test_create` speed=fast, slow and platform from the class
/// - `api.TestUsers.test_delete` slow=false overriding the class
pub fn write_catalog(test_dir: &Path) -> PathBuf {
    let catalog = serde_json::json!({
        "functions": [
            { "module": "m", "name": "test_fast", "attributes": { "tst_speed": "fast" } },
            { "module": "m", "name": "test_plain" },
            { "module": "m", "name": "helper", "attributes": { "tst_slow": true } }
        ],
        "classes": [
            {
                "module": "api",
                "name": "TestUsers",
                "attributes": { "tst_slow": true, "tst_platform": ["Linux", "mac"] },
                "methods": [
                    { "name": "test_create", "attributes": { "tst_speed": "fast" } },
                    { "name": "test_delete", "attributes": { "tst_slow": false } },
                    { "name": "setup_data" }
                ]
            }
        ]
    });

    let path = test_dir.join("catalog.json");
    fs::write(&path, serde_json::to_string_pretty(&catalog).unwrap())
        .expect("Failed to write test catalog");
    path
}

/// write a config file with the given content
pub fn write_config(test_dir: &Path, content: &str) -> PathBuf {
    let path = test_dir.join("config.json");
    fs::write(&path, content).expect("Failed to write test config");
    path
}

/// run tagsel with an isolated environment
///
/// `TAGSEL_CONFIG` points into the test directory so a user's own config is
/// never picked up
pub fn run_tagsel_with_env(
    test_dir: &Path,
    args: &[&str],
    env_vars: &[(&str, &str)],
) -> Output {
    let mut cmd = Command::new(tagsel_binary_path());
    cmd.args(args);

    for key in TAGSEL_ENV_VARS {
        cmd.env_remove(key);
    }
    cmd.env("TAGSEL_CONFIG", test_dir.join("missing-config.json"));

    for (key, value) in env_vars {
        cmd.env(key, value);
    }

    cmd.output().expect("Failed to run tagsel")
}

/// run tagsel with no extra environment
pub fn run_tagsel(test_dir: &Path, args: &[&str]) -> Output {
    run_tagsel_with_env(test_dir, args, &[])
}

pub fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

/// parse a JSON-RPC envelope printed on stdout
pub fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).expect("stdout should be valid JSON")
}
