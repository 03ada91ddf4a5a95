use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn docsim_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("docsim");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    setup_test_env_with_wordcloud("")
}

/// Build a workspace under a tempdir: config, data dir, and two fixture
/// documents. `wordcloud_section` is appended to the config verbatim.
fn setup_test_env_with_wordcloud(wordcloud_section: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let files_dir = root.join("files");
    fs::create_dir_all(&files_dir).unwrap();
    fs::write(
        files_dir.join("greeting.txt"),
        "Hello world.\n\nSecond paragraph here.",
    )
    .unwrap();
    fs::write(files_dir.join("kitten.txt"), "kitten").unwrap();
    fs::write(files_dir.join("sitting.txt"), "sitting").unwrap();

    let config_content = format!(
        r#"[db]
path = "{root}/data/docsim.sqlite"

[storage]
root = "{root}/data/blobs"

[server]
bind = "127.0.0.1:7402"
{wordcloud_section}
"#,
        root = root.display(),
        wordcloud_section = wordcloud_section,
    );

    let config_path = config_dir.join("docsim.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_docsim(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = docsim_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run docsim binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

/// Extract the value of a `key:  value` line from command output.
fn field(stdout: &str, key: &str) -> String {
    let prefix = format!("{}:", key);
    stdout
        .lines()
        .find_map(|line| line.strip_prefix(&prefix))
        .unwrap_or_else(|| panic!("no '{}' line in output:\n{}", key, stdout))
        .trim()
        .to_string()
}

fn put_file(config_path: &Path, file: &str) -> String {
    let files_dir = config_path.parent().unwrap().parent().unwrap().join("files");
    let path = files_dir.join(file);
    let (stdout, stderr, success) =
        run_docsim(config_path, &["put", path.to_str().unwrap()]);
    assert!(success, "put failed: stdout={}, stderr={}", stdout, stderr);
    field(&stdout, "id")
}

#[test]
fn test_init_creates_database() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_docsim(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_docsim(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_docsim(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_put_then_get_round_trips() {
    let (_tmp, config_path) = setup_test_env();
    run_docsim(&config_path, &["init"]);

    let id = put_file(&config_path, "greeting.txt");
    let (stdout, stderr, success) = run_docsim(&config_path, &["get", &id]);
    assert!(success, "get failed: stderr={}", stderr);
    assert_eq!(stdout, "Hello world.\n\nSecond paragraph here.");
}

#[test]
fn test_put_duplicate_content_returns_same_id() {
    let (tmp, config_path) = setup_test_env();
    run_docsim(&config_path, &["init"]);

    // Same content under a different name.
    let copy = tmp.path().join("files").join("copy.txt");
    fs::write(&copy, "Hello world.\n\nSecond paragraph here.").unwrap();

    let first = put_file(&config_path, "greeting.txt");
    let second = put_file(&config_path, "copy.txt");
    assert_eq!(first, second);

    // The first upload's name survives.
    let (stdout, _, success) = run_docsim(&config_path, &["metadata", &first]);
    assert!(success);
    assert_eq!(field(&stdout, "name"), "greeting.txt");
}

#[test]
fn test_analyze_reports_counts() {
    let (_tmp, config_path) = setup_test_env();
    run_docsim(&config_path, &["init"]);

    let id = put_file(&config_path, "greeting.txt");
    let (stdout, stderr, success) = run_docsim(&config_path, &["analyze", &id]);
    assert!(success, "analyze failed: stderr={}", stderr);
    assert_eq!(field(&stdout, "paragraphs"), "2");
    assert_eq!(field(&stdout, "words"), "5");
    assert_eq!(field(&stdout, "characters"), "36");
    assert_eq!(field(&stdout, "word_cloud"), "(none)");
}

#[test]
fn test_analyze_twice_returns_identical_record() {
    let (_tmp, config_path) = setup_test_env();
    run_docsim(&config_path, &["init"]);

    let id = put_file(&config_path, "greeting.txt");
    let (first, _, _) = run_docsim(&config_path, &["analyze", &id]);
    let (second, _, _) = run_docsim(&config_path, &["analyze", &id]);
    assert_eq!(first, second);
}

#[test]
fn test_compare_kitten_sitting() {
    let (_tmp, config_path) = setup_test_env();
    run_docsim(&config_path, &["init"]);

    let a = put_file(&config_path, "kitten.txt");
    let b = put_file(&config_path, "sitting.txt");
    let (stdout, stderr, success) = run_docsim(&config_path, &["compare", &a, &b]);
    assert!(success, "compare failed: stderr={}", stderr);
    assert_eq!(field(&stdout, "original"), a);
    assert_eq!(field(&stdout, "compared"), b);
    assert_eq!(field(&stdout, "similarity"), "57.14%");
}

#[test]
fn test_analyze_tolerates_unreachable_wordcloud_generator() {
    // Nothing listens on port 1; generation fails, analysis must not.
    let (_tmp, config_path) = setup_test_env_with_wordcloud(
        r#"
[wordcloud]
provider = "remote"
url = "http://127.0.0.1:1/wordcloud"
timeout_secs = 2
"#,
    );
    run_docsim(&config_path, &["init"]);

    let id = put_file(&config_path, "greeting.txt");
    let (stdout, stderr, success) = run_docsim(&config_path, &["analyze", &id]);
    assert!(
        success,
        "analyze should survive generator failure: stderr={}",
        stderr
    );
    assert_eq!(field(&stdout, "paragraphs"), "2");
    assert_eq!(field(&stdout, "word_cloud"), "(none)");

    // The missing cloud surfaces as not found.
    let out = config_path.parent().unwrap().join("cloud.png");
    let (_, stderr, success) =
        run_docsim(&config_path, &["wordcloud", &id, "--out", out.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("not found"), "stderr: {}", stderr);
}

#[test]
fn test_unknown_id_is_not_found() {
    let (_tmp, config_path) = setup_test_env();
    run_docsim(&config_path, &["init"]);

    for args in [
        vec!["get", "11111111-1111-4111-8111-111111111111"],
        vec!["metadata", "11111111-1111-4111-8111-111111111111"],
        vec!["analyze", "11111111-1111-4111-8111-111111111111"],
    ] {
        let (_, stderr, success) = run_docsim(&config_path, &args);
        assert!(!success, "{:?} should fail", args);
        assert!(
            stderr.contains("not found"),
            "{:?} stderr should say not found: {}",
            args,
            stderr
        );
    }
}

#[test]
fn test_put_empty_file_is_rejected() {
    let (tmp, config_path) = setup_test_env();
    run_docsim(&config_path, &["init"]);

    let empty = tmp.path().join("files").join("empty.txt");
    fs::write(&empty, "").unwrap();

    let (_, stderr, success) = run_docsim(&config_path, &["put", empty.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("empty"), "stderr: {}", stderr);
}
