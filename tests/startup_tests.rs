//! Tests for main.rs startup validation (token secret, origin, cookie policy)

use std::process::{Command, Output, Stdio};
use std::time::Duration;

const GOOD_SECRET: &str = "test-secret-that-is-long-enough!!";

fn cargo_bin() -> std::path::PathBuf {
    // Get the path to the compiled binary
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps
    path.push("bistro");
    path
}

fn temp_db(name: &str) -> String {
    std::env::temp_dir()
        .join(format!("bistro-{}-{}.db", name, std::process::id()))
        .to_string_lossy()
        .into_owned()
}

fn run(secret: Option<&str>, args: &[&str]) -> Output {
    let mut cmd = Command::new(cargo_bin());
    cmd.env_remove("ACCESS_TOKEN_SECRET")
        .env_remove("ALLOWED_ORIGIN")
        .env_remove("COOKIE_SAME_SITE")
        .env_remove("SECURE_COOKIES")
        .args(args)
        .stderr(Stdio::piped())
        .stdout(Stdio::piped());
    if let Some(secret) = secret {
        cmd.env("ACCESS_TOKEN_SECRET", secret);
    }
    cmd.output().expect("Failed to run binary")
}

fn combined_output(output: &Output) -> String {
    // tracing logs to stdout by default
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{}{}", stdout, stderr)
}

#[test]
fn test_missing_secret_exits_with_error() {
    let output = run(None, &[]);

    assert!(
        !output.status.success(),
        "Should exit with error when ACCESS_TOKEN_SECRET is missing"
    );

    let combined = combined_output(&output);
    assert!(
        combined.contains("ACCESS_TOKEN_SECRET") && combined.contains("required"),
        "Should mention ACCESS_TOKEN_SECRET is required, got: {}",
        combined
    );
}

#[test]
fn test_short_secret_exits_with_error() {
    let output = run(Some("too-short"), &[]);

    assert!(!output.status.success());
    let combined = combined_output(&output);
    assert!(
        combined.contains("shorter than 32"),
        "Should mention minimum secret length, got: {}",
        combined
    );
}

#[test]
fn test_secret_file_is_accepted() {
    let path = std::env::temp_dir().join(format!("bistro-secret-{}", std::process::id()));
    std::fs::write(&path, format!("{}\n", GOOD_SECRET)).unwrap();
    let db = temp_db("secret-file");

    let mut child = Command::new(cargo_bin())
        .env_remove("ACCESS_TOKEN_SECRET")
        .args([
            "--jwt-secret-file",
            path.to_str().unwrap(),
            "--port",
            "0",
            "--database",
            &db,
        ])
        .stderr(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to run binary");

    std::thread::sleep(Duration::from_millis(500));

    let still_running = child.try_wait().unwrap().is_none();
    let _ = child.kill();
    let _ = child.wait();
    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(&db);

    assert!(still_running, "Server should start with a secret file");
}

#[test]
fn test_invalid_origin_exits_with_error() {
    let output = run(Some(GOOD_SECRET), &["--allowed-origin", "ftp://example.com"]);

    assert!(!output.status.success());
    let combined = combined_output(&output);
    assert!(
        combined.contains("http or https"),
        "Should mention the scheme requirement, got: {}",
        combined
    );
}

#[test]
fn test_same_site_none_requires_secure_cookies() {
    let output = run(Some(GOOD_SECRET), &["--same-site", "none"]);

    assert!(!output.status.success());
    let combined = combined_output(&output);
    assert!(
        combined.contains("--secure-cookies"),
        "Should mention secure cookies, got: {}",
        combined
    );
}

#[test]
fn test_invalid_base_path_exits_with_error() {
    let output = run(Some(GOOD_SECRET), &["--base", "api"]);

    assert!(!output.status.success());
    let combined = combined_output(&output);
    assert!(
        combined.contains("must start with '/'"),
        "Should explain base path format, got: {}",
        combined
    );
}

#[test]
fn test_valid_configuration_starts() {
    let db = temp_db("valid");

    let mut child = Command::new(cargo_bin())
        .env("ACCESS_TOKEN_SECRET", GOOD_SECRET)
        .args([
            "--port",
            "0",
            "--database",
            &db,
            "--same-site",
            "none",
            "--secure-cookies",
        ])
        .stderr(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to run binary");

    // Give it a moment to start or fail
    std::thread::sleep(Duration::from_millis(500));

    let still_running = child.try_wait().unwrap().is_none();
    let _ = child.kill();
    let _ = child.wait();
    let _ = std::fs::remove_file(&db);

    assert!(still_running, "Server should be running with a valid configuration");
}

#[test]
fn test_malformed_dotenv_is_reported() {
    let dir = std::env::temp_dir().join(format!("bistro-dotenv-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(".env"), "this line is not a valid assignment\n").unwrap();

    let output = Command::new(cargo_bin())
        .current_dir(&dir)
        .env_remove("ACCESS_TOKEN_SECRET")
        .stderr(Stdio::piped())
        .stdout(Stdio::piped())
        .output()
        .expect("Failed to run binary");
    let _ = std::fs::remove_dir_all(&dir);

    let combined = combined_output(&output);
    assert!(
        combined.contains("Failed to load .env file"),
        "Should warn about the malformed .env, got: {}",
        combined
    );
}

#[test]
fn test_missing_dotenv_is_silent() {
    let dir = std::env::temp_dir().join(format!("bistro-no-dotenv-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let output = Command::new(cargo_bin())
        .current_dir(&dir)
        .env_remove("ACCESS_TOKEN_SECRET")
        .stderr(Stdio::piped())
        .stdout(Stdio::piped())
        .output()
        .expect("Failed to run binary");
    let _ = std::fs::remove_dir_all(&dir);

    assert!(!combined_output(&output).contains(".env"));
}
