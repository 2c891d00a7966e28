use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();
static COUNTER: AtomicU32 = AtomicU32::new(0);

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

/// Integration tests exercise the HTTP surface against a live store; without
/// a configured database there is nothing to run against.
pub fn database_configured() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/jotter-api");
        cmd.env("JOTTER_PORT", port.to_string())
            .env(
                "JWT_SECRET",
                std::env::var("JWT_SECRET").unwrap_or_else(|_| "integration-test-secret".to_string()),
            )
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

/// Register a fresh account and return (token, user id). Emails are unique
/// per process so suites can run repeatedly against the same database.
pub async fn register_user(
    server: &TestServer,
    client: &reqwest::Client,
    tag: &str,
) -> Result<(String, String)> {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let email = format!("{}-{}-{}@test.example.com", tag, std::process::id(), n);

    let res = client
        .post(format!("{}/api/users/register", server.base_url))
        .json(&serde_json::json!({
            "email": email,
            "username": format!("{}{}", tag, n),
            "password": "correcthorse"
        }))
        .send()
        .await?;

    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "register failed with {}",
        res.status()
    );

    let body: serde_json::Value = res.json().await?;
    let token = body["token"].as_str().context("missing token")?.to_string();
    let user_id = body["user"]["id"]
        .as_str()
        .context("missing user id")?
        .to_string();

    Ok((token, user_id))
}
