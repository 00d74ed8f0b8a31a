use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use configs::AppConfig;
use server::startup;

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let mut cfg = AppConfig::default();
    cfg.database.url = "sqlite::memory:".into();
    cfg.auth.jwt_secret = "e2e-secret".into();

    let app = startup::build_app(startup::prepare_state(&cfg).await?);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"status": "ok"}));
    Ok(())
}

#[tokio::test]
async fn e2e_register_book_and_cancel() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();
    let username = format!("user_{}", Uuid::new_v4().simple());

    let res = client
        .post(format!("{}/api/register", app.base_url))
        .json(&json!({"username": username, "password": "Str0ngPass"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let session: Value = res.json().await?;
    let token = session["token"].as_str().unwrap_or_default().to_string();

    // CORS preflight from the browser client
    let res = client
        .request(reqwest::Method::OPTIONS, format!("{}/api/bookings", app.base_url))
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await?;
    assert!(res.status().is_success());
    assert!(res.headers().contains_key("access-control-allow-origin"));

    let services: Vec<Value> = client.get(format!("{}/api/services", app.base_url)).send().await?.json().await?;
    let deep = services.iter().find(|s| s["name"] == "Deep Cleaning").cloned().unwrap_or_default();

    let res = client
        .post(format!("{}/api/bookings", app.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "customer_name": "Hermione",
            "address": "8 Heathgate",
            "date_time": "2024-09-19T08:00",
            "service_id": deep["id"],
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created: Value = res.json().await?;
    assert_eq!(created["service_price"], deep["price"]);
    assert_eq!(created["date_time"], "2024-09-19T08:00:00");

    let res = client
        .put(format!("{}/api/bookings/{}", app.base_url, created["id"]))
        .bearer_auth(&token)
        .json(&json!({
            "customer_name": "Hermione",
            "address": "8 Heathgate",
            "date_time": "2024-09-19T08:00",
            "service_id": deep["id"],
            "status": "cancelled",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["status"], "cancelled");

    let res = client.get(format!("{}/api/bookings", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}
