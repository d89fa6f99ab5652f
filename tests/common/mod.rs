use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/ebank-api");
        cmd.env("EBANK_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL from .env (loaded by the server)
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
                // Consider server ready on any non-404 response
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
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
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Create a customer and return its id
#[allow(dead_code)]
pub async fn create_customer(base_url: &str, name: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/customers", base_url))
        .json(&serde_json::json!({
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase()),
        }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "customer create failed: {}", res.status());

    let body = res.json::<serde_json::Value>().await?;
    let id = body["data"]["id"]
        .as_str()
        .context("customer id missing")?
        .to_string();
    Ok(id)
}

/// Open a current account for the customer and return the account id
#[allow(dead_code)]
pub async fn create_current_account(
    base_url: &str,
    customer_id: &str,
    initial_balance: f64,
    overdraft: f64,
) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/accounts/current", base_url))
        .json(&serde_json::json!({
            "initial_balance": initial_balance,
            "overdraft": overdraft,
            "customer_id": customer_id,
        }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "account create failed: {}", res.status());

    let body = res.json::<serde_json::Value>().await?;
    let id = body["data"]["id"]
        .as_str()
        .context("account id missing")?
        .to_string();
    Ok(id)
}

/// Fetch an account's current balance
#[allow(dead_code)]
pub async fn account_balance(base_url: &str, account_id: &str) -> Result<f64> {
    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/accounts/{}", base_url, account_id))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "account fetch failed: {}", res.status());

    let body = res.json::<serde_json::Value>().await?;
    body["data"]["balance"]
        .as_f64()
        .context("account balance missing")
}
