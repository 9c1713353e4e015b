use std::io::Write;
use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;

use reqwest::{multipart, Client};
use tempfile::{NamedTempFile, TempDir};
use tokio::time::{sleep, timeout};

/// Find an available port
fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Config pointing storage into `dir` and ffmpeg at a path that does not exist.
fn minimal_config(port: u16, dir: &Path) -> String {
    format!(
        r#"
[server]
host = "127.0.0.1"
port = {port}

[storage]
upload_dir = "{uploads}"
output_dir = "{output}"

[converter]
ffmpeg_path = "/nonexistent/bin/ffmpeg"
"#,
        uploads = dir.join("uploads").display(),
        output = dir.join("output").display(),
    )
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// Spawn the server and return a handle
async fn spawn_server(config_path: &Path) -> tokio::process::Child {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_transcoder"))
        .env("TRANSCODER_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server")
}

/// Wait for server to be ready
async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/api/v1/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_health_endpoint() {
    let port = get_available_port();
    let dir = TempDir::new().unwrap();
    let config_file = write_config(&minimal_config(port, dir.path()));

    // Start server
    let mut server = spawn_server(config_file.path()).await;

    // Wait for server to be ready
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    // Test health endpoint
    let client = Client::new();
    let response = client
        .get(format!("http://127.0.0.1:{}/api/v1/health", port))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["ffmpeg_available"], false);

    // Storage directories are created at startup
    assert!(dir.path().join("uploads").is_dir());
    assert!(dir.path().join("output").is_dir());

    // Cleanup
    server.kill().await.ok();
}

#[tokio::test]
async fn test_submission_rejected_without_ffmpeg() {
    let port = get_available_port();
    let dir = TempDir::new().unwrap();
    let config_file = write_config(&minimal_config(port, dir.path()));

    let mut server = spawn_server(config_file.path()).await;
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let form = multipart::Form::new()
        .part(
            "file",
            multipart::Part::bytes(b"media bytes".to_vec()).file_name("movie.mkv"),
        )
        .text("operation", "compress");

    let client = Client::new();
    let response = client
        .post(format!("http://127.0.0.1:{}/api/v1/jobs", port))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 503);
    assert!(!dir.path().join("uploads/movie.mkv").exists());

    let response = client
        .get(format!("http://127.0.0.1:{}/api/v1/jobs/1", port))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 404);

    // Cleanup
    server.kill().await.ok();
}

#[tokio::test]
async fn test_config_endpoint() {
    let port = get_available_port();
    let dir = TempDir::new().unwrap();
    let config_file = write_config(&minimal_config(port, dir.path()));

    let mut server = spawn_server(config_file.path()).await;
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let client = Client::new();
    let response = client
        .get(format!("http://127.0.0.1:{}/api/v1/config", port))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["server"]["port"], port);
    assert_eq!(json["converter"]["ffmpeg_path"], "/nonexistent/bin/ffmpeg");

    // Cleanup
    server.kill().await.ok();
}

#[tokio::test]
async fn test_missing_config_file_exits_with_error() {
    let result = timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_transcoder"))
            .env("TRANSCODER_CONFIG", "/nonexistent/config.toml")
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command");

    assert!(!result.status.success());
}

#[tokio::test]
async fn test_invalid_config_exits_with_error() {
    let config_file = write_config(
        r#"
[storage]
upload_dir = "media"
output_dir = "media"
"#,
    );

    let result = timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_transcoder"))
            .env("TRANSCODER_CONFIG", config_file.path())
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command");

    assert!(!result.status.success());
}
