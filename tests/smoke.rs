use lunchbox::error::LunchError;
use lunchbox::options::OptionLists;
use lunchbox::response::{ToolMetadata, ToolResponse};
use lunchbox::server::LunchServer;
use lunchbox::service::Lunchbox;
use lunchbox::store::Store;
use rmcp::ServerHandler;

#[test]
fn tool_response_success_serializes_correctly() {
    let response = ToolResponse::success(
        "'국밥집' registered (3 rows in sheet)".to_string(),
        ToolMetadata::new("register_venue", 0.25),
    );

    let json_str = serde_json::to_string(&response).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json_str).unwrap();

    assert_eq!(parsed["status"], "success");
    assert_eq!(parsed["content"], "'국밥집' registered (3 rows in sheet)");
    assert_eq!(parsed["content_type"], "text");
    assert_eq!(parsed["metadata"]["tool_name"], "register_venue");
    assert!(parsed["metadata"]["duration_seconds"].is_f64());
}

#[test]
fn tool_response_json_embeds_document() {
    let response = ToolResponse::json(&["a", "b"], ToolMetadata::new("list_venues", 0.0));
    assert_eq!(response.status, "success");
    assert_eq!(response.content_type, "json");
    let inner: Vec<String> = serde_json::from_str(&response.content).unwrap();
    assert_eq!(inner, vec!["a", "b"]);
}

#[test]
fn tool_response_error_serializes_correctly() {
    let err = LunchError::Transport {
        backend: "sheets".to_string(),
        message: "dns failure for https://secret.example".to_string(),
    };
    let response = ToolResponse::error(err.user_message(), ToolMetadata::new("ask", 0.001));

    let json_str = serde_json::to_string(&response).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json_str).unwrap();

    assert_eq!(parsed["status"], "error");
    assert!(!parsed["content"].as_str().unwrap().contains("secret"));
}

#[test]
fn non_finite_duration_clamped() {
    let response = ToolResponse::success("x".to_string(), ToolMetadata::new("t", f64::NAN));
    let parsed: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&response).unwrap()).unwrap();
    assert_eq!(parsed["metadata"]["duration_seconds"], 0.0);
}

#[test]
fn into_call_tool_result_is_transport_success() {
    let result = ToolResponse::error("boom".to_string(), ToolMetadata::new("t", 0.0))
        .into_call_tool_result();
    let value = serde_json::to_value(&result).unwrap();
    assert_ne!(value["isError"], serde_json::Value::Bool(true));
    let text = value["content"][0]["text"].as_str().unwrap();
    let envelope: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(envelope["status"], "error");
    assert_eq!(envelope["content"], "boom");
}

#[test]
fn server_info_mentions_agent_state() {
    let dir = std::env::temp_dir().join("lunchbox-test-smoke-info");
    let lunchbox = Lunchbox::new(Store::local(dir), OptionLists::default(), None);
    let server = LunchServer::with_lunchbox(lunchbox);
    let info = server.get_info();
    assert_eq!(info.server_info.name, "lunchbox");
    let instructions = info.instructions.unwrap();
    assert!(instructions.contains("recommend"));
    assert!(instructions.contains("unavailable"));
}
