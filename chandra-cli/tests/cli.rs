use std::process::{Command, Output};

fn process_with_chandra(args: &[&str]) -> Output {
    let cache = tempfile::tempdir().unwrap();
    Command::new(env!("CARGO_BIN_EXE_process-with-chandra"))
        .args(args)
        // An empty cache means any attempt to load the model would have to hit the network.
        .env("CHANDRA_CACHE_DIR", cache.path())
        .output()
        .unwrap()
}

#[test]
fn no_arguments_prints_usage_and_exits_with_one() {
    let output = process_with_chandra(&[]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Usage"), "{stderr}");
    assert!(!stderr.contains("Loading OCR model"), "{stderr}");
}

#[test]
fn one_argument_prints_usage_and_exits_with_one() {
    let output = process_with_chandra(&["scan.png"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Usage"), "{stderr}");
    assert!(stderr.contains("OUTPUT_DIR"), "{stderr}");
    assert!(!stderr.contains("Loading OCR model"), "{stderr}");
}

#[test]
fn help_exits_successfully() {
    let output = process_with_chandra(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("INPUT_FILE"), "{stdout}");
}

#[test]
fn loader_help_exits_successfully() {
    let output = Command::new(env!("CARGO_BIN_EXE_load-chandra-model"))
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--cache-dir"));
}
