use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn tgapi_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tgapi");
    path
}

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/openapi.json")
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let config_dir = tmp.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();

    // Unroutable URL: any test that accidentally fetches fails fast.
    let config_content = r#"[catalog]
url = "http://127.0.0.1:9/openapi.json"
timeout_secs = 2
max_retries = 0

[bot]
cache_time = 1
"#;

    let config_path = config_dir.join("tg-apidoc.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_tgapi(tmp: &TempDir, config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = tgapi_binary();
    let output = Command::new(&binary)
        .current_dir(tmp.path())
        .env_remove("TELEGRAM_BOT_TOKEN")
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run tgapi binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn result_ids(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter(|l| !l.starts_with("next_offset:") && !l.is_empty())
        .map(|l| l.split_whitespace().next().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_search_substring() {
    let (tmp, config_path) = setup_test_env();
    let spec = fixture();

    let (stdout, stderr, success) = run_tgapi(
        &tmp,
        &config_path,
        &["search", "send", "--spec", spec.to_str().unwrap()],
    );
    assert!(success, "search failed: stdout={}, stderr={}", stdout, stderr);
    assert_eq!(result_ids(&stdout), vec!["sendMessage", "sendPhoto"]);
    assert!(stdout.contains("next_offset: 50"));
}

#[test]
fn test_search_case_insensitive() {
    let (tmp, config_path) = setup_test_env();
    let spec = fixture();

    let (lower, _, _) = run_tgapi(
        &tmp,
        &config_path,
        &["search", "send", "--spec", spec.to_str().unwrap()],
    );
    let (upper, _, _) = run_tgapi(
        &tmp,
        &config_path,
        &["search", "SEND", "--spec", spec.to_str().unwrap()],
    );
    assert_eq!(lower, upper);
}

#[test]
fn test_search_empty_query_lists_catalog() {
    let (tmp, config_path) = setup_test_env();
    let spec = fixture();

    let (stdout, stderr, success) = run_tgapi(
        &tmp,
        &config_path,
        &["search", "", "--spec", spec.to_str().unwrap()],
    );
    assert!(success, "search failed: stderr={}", stderr);
    assert_eq!(
        result_ids(&stdout),
        vec!["sendMessage", "sendPhoto", "getMe", "Message", "User", "localapi"]
    );
}

#[test]
fn test_search_no_match() {
    let (tmp, config_path) = setup_test_env();
    let spec = fixture();

    let (stdout, _, success) = run_tgapi(
        &tmp,
        &config_path,
        &["search", "xyz-nomatch", "--spec", spec.to_str().unwrap()],
    );
    assert!(success);
    assert!(stdout.contains("No results."));
    assert!(stdout.contains("next_offset: 50"));
}

#[test]
fn test_search_offset_past_end() {
    let (tmp, config_path) = setup_test_env();
    let spec = fixture();

    let (stdout, _, success) = run_tgapi(
        &tmp,
        &config_path,
        &[
            "search",
            "send",
            "--offset",
            "50",
            "--spec",
            spec.to_str().unwrap(),
        ],
    );
    assert!(success);
    assert!(stdout.contains("No results."));
    assert!(stdout.contains("next_offset: 100"));
}

#[test]
fn test_search_prints_body() {
    let (tmp, config_path) = setup_test_env();
    let spec = fixture();

    let (stdout, _, success) = run_tgapi(
        &tmp,
        &config_path,
        &["search", "getme", "--body", "--spec", spec.to_str().unwrap()],
    );
    assert!(success);
    assert!(stdout.contains("[getMe](https://core.telegram.org/bots/api/#getme)"));
    assert!(stdout.contains("\\-\\> [User](https://core.telegram.org/bots/api/#user)"));
}

#[test]
fn test_check_reports_counts() {
    let (tmp, config_path) = setup_test_env();
    let spec = fixture();

    let (stdout, stderr, success) =
        run_tgapi(&tmp, &config_path, &["check", "--spec", spec.to_str().unwrap()]);
    assert!(success, "check failed: stderr={}", stderr);
    assert!(stdout.contains("methods: 3"));
    assert!(stdout.contains("types: 3"));
    assert!(stdout.contains("OK"));
}

#[test]
fn test_check_invalid_document_fails() {
    let (tmp, config_path) = setup_test_env();
    let bad = tmp.path().join("bad.json");
    fs::write(&bad, "{\"paths\": {}}").unwrap();

    let (_, stderr, success) =
        run_tgapi(&tmp, &config_path, &["check", "--spec", bad.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("components.schemas"), "stderr={}", stderr);
}

#[test]
fn test_fetch_failure_is_reported() {
    let (tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_tgapi(&tmp, &config_path, &["check"]);
    assert!(!success);
    assert!(stderr.contains("Failed to fetch"), "stderr={}", stderr);
}

#[test]
fn test_serve_requires_token() {
    let (tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_tgapi(&tmp, &config_path, &["serve"]);
    assert!(!success);
    assert!(stderr.contains("--token"), "stderr={}", stderr);
}

#[test]
fn test_invalid_config_is_rejected() {
    let (tmp, config_path) = setup_test_env();
    fs::write(&config_path, "[catalog]\nurl = \"ftp://nowhere\"\n").unwrap();
    let spec = fixture();

    let (_, stderr, success) = run_tgapi(
        &tmp,
        &config_path,
        &["search", "send", "--spec", spec.to_str().unwrap()],
    );
    assert!(!success);
    assert!(stderr.contains("catalog.url"), "stderr={}", stderr);
}
