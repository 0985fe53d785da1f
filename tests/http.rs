use std::net::SocketAddr;
use std::sync::Arc;

use design_harness::config::Config;
use design_harness::router::ToolRouter;
use design_harness::server;
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn start_server() -> SocketAddr {
    let router = Arc::new(ToolRouter::from_config(&Config::minimal()).unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        server::serve(listener, router).await.unwrap();
    });
    addr
}

async fn call_tool(addr: SocketAddr, tool: &str, body: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("http://{}/tools/{}", addr, tool))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn test_health() {
    let addr = start_server().await;
    let body: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_tools_list_has_schemas() {
    let addr = start_server().await;
    let body: Value = reqwest::get(format!("http://{}/tools/list", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let tools = body["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 15);
    let find_color = tools.iter().find(|t| t["name"] == "find_color").unwrap();
    assert_eq!(find_color["parameters"]["type"], "object");
    assert_eq!(find_color["parameters"]["required"], json!(["query"]));
}

#[tokio::test]
async fn test_tool_call_success() {
    let addr = start_server().await;
    let (status, body) = call_tool(
        addr,
        "validate_contrast",
        json!({ "foreground": "#000000", "background": "#ffffff" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["result"]["ratio"], 21.0);
    assert_eq!(body["result"]["wcagAA"]["passes"], true);
    assert_eq!(body["preview"]["mimeType"], "image/svg+xml");
}

#[tokio::test]
async fn test_client_errors_are_400() {
    let addr = start_server().await;

    let (status, body) = call_tool(
        addr,
        "convert_color",
        json!({ "color": "notacolor", "toFormat": "hex" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "invalid_color");
    assert!(body["hint"].is_string());

    let (status, body) = call_tool(addr, "find_color", json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "invalid_argument");

    let (status, body) = call_tool(
        addr,
        "generate_component",
        json!({ "component": "button", "framework": "svelte" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "unsupported_target");
    assert!(body["supportedFrameworks"].as_array().unwrap().len() >= 4);
}

#[tokio::test]
async fn test_missing_targets_are_404() {
    let addr = start_server().await;

    let (status, body) = call_tool(addr, "no_such_tool", json!({})).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "unknown_tool");
    assert!(body["validTools"]
        .as_array()
        .unwrap()
        .contains(&json!("find_color")));

    let (status, body) =
        call_tool(addr, "query_component_specs", json!({ "component": "unicorn" })).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "unknown_component");
}

#[tokio::test]
async fn test_resources_list_and_read() {
    let addr = start_server().await;
    let client = reqwest::Client::new();

    let list: Value = client
        .get(format!("http://{}/resources/list", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let uris: Vec<&str> = list["resources"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["uri"].as_str())
        .collect();
    assert!(uris.contains(&"design://tokens"));
    assert!(uris.contains(&"design://sections/1"));

    let resp = client
        .get(format!("http://{}/resources/read", addr))
        .query(&[("uri", "design://tokens/colors")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let colors: Value = resp.json().await.unwrap();
    assert_eq!(colors["blue"]["600"], "#2563eb");

    let resp = client
        .get(format!("http://{}/resources/read", addr))
        .query(&[("uri", "design://sections/99")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}
