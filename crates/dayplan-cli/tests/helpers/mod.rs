use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

/// Nothing listens on the discard port, so every request fails fast.
pub const UNREACHABLE_API: &str = "http://127.0.0.1:9";

/// Runs the binary from an empty working directory against a dead API.
pub struct CliTestHarness {
    temp_dir: TempDir,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        Self { temp_dir }
    }

    /// Writes `dayplan.toml` into the working directory.
    pub fn with_config(self, toml: &str) -> Self {
        fs::write(self.temp_dir.path().join("dayplan.toml"), toml).expect("Failed to write config");
        self
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("dayplan").expect("Failed to find dayplan binary");
        cmd.current_dir(self.temp_dir.path())
            .env("DAYPLAN_API_BASE_URL", UNREACHABLE_API)
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn command_against(&self, api: &FakeApi) -> Command {
        let mut cmd = self.command();
        cmd.env("DAYPLAN_API_BASE_URL", &api.base_url);
        cmd
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }
}

/// A local event API that serves one fixed event list and accepts every write.
pub struct FakeApi {
    pub base_url: String,
    requests: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

impl FakeApi {
    pub fn serve(events_body: &'static str) -> Self {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        let base_url = format!("http://{}", listener.local_addr().expect("No local address"));
        let requests = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = requests.clone();

        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let request_line = String::from_utf8_lossy(&buf)
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .to_string();
                let body = if request_line.starts_with("GET ") { events_body } else { "{}" };
                log.lock().unwrap().push(request_line);

                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        Self { base_url, requests }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}
