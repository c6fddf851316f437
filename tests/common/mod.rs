use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use unichat::api::HttpBackend;
use unichat::config::ServerConfig;
use unichat::storage::FileSessionStore;

/// One flat history record as the backend serializes it
#[allow(dead_code)]
pub fn record_json(
    id: i64,
    session_id: &str,
    query: &str,
    reply: Option<&str>,
    created_at: &str,
) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "session_id": session_id,
        "user_query": query,
        "bot_response": reply,
        "model_used": "default",
        "detected_intent": null,
        "confidence_score": null,
        "created_at": created_at,
    })
}

#[allow(dead_code)]
pub fn backend_for(base_url: &str) -> HttpBackend {
    let config = ServerConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        ..Default::default()
    };
    HttpBackend::new(&config).expect("failed to create http backend")
}

#[allow(dead_code)]
pub fn create_temp_store() -> (FileSessionStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let store = FileSessionStore::new_with_path(tmp.path().join("state.json"))
        .expect("failed to create file session store");
    (store, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
