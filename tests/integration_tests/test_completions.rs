// integration tests for shell completion generation

use crate::common::*;

#[test]
fn test_completions_for_each_shell() {
    let test_dir = create_test_dir(&unique_test_name("completions"));

    for shell in ["bash", "zsh", "fish"] {
        let output = run_tagsel(&test_dir, &["completions", shell]);
        assert!(output.status.success(), "completions failed for {}", shell);

        let script = String::from_utf8_lossy(&output.stdout);
        assert!(script.contains("tagsel"), "{} script should name the binary", shell);
        assert!(script.contains("eval-attr"), "{} script should list flags", shell);
    }

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_completions_unknown_shell() {
    let test_dir = create_test_dir(&unique_test_name("completions_bad"));

    let output = run_tagsel(&test_dir, &["completions", "tcsh"]);
    cleanup_test_dir(&test_dir);

    // clap usage errors exit with 2
    assert_eq!(output.status.code(), Some(2));
}
