mod common;

use std::time::Duration;

use common::TestServer;

#[tokio::test]
async fn binary_serves_health_and_root() -> anyhow::Result<()> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(20)).await?;

    let health: serde_json::Value = reqwest::get(format!("{}/health", server.base_url)).await?.json().await?;
    assert_eq!(health["success"], true);
    assert_eq!(health["data"]["database"], "ok");

    let root: serde_json::Value = reqwest::get(format!("{}/", server.base_url)).await?.json().await?;
    assert_eq!(root["data"]["name"], "KinaUna API");

    let response = reqwest::Client::new()
        .get(format!("{}/api/progeny", server.base_url))
        .bearer_auth("not-a-token")
        .send()
        .await?;
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
    Ok(())
}
