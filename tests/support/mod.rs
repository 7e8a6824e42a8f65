// Shared one-time bootstrap for integration tests: a stub language-model
// endpoint plus the battle server itself, both on ephemeral ports.
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use axum::{Json, Router, routing::post};

// Global base URL used by all tests after the server publishes its bound address.
static SERVER_URL: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the server bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Ensure the test server is running and return the shared base URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // An OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Stub language model first, so its address can go into the
                // server's environment config.
                let llm_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind stub llm port");
                let llm_addr = llm_listener.local_addr().expect("stub llm addr");
                let llm_app = Router::new().route("/completion", post(stub_completion_handler));
                tokio::spawn(async move {
                    axum::serve(llm_listener, llm_app)
                        .await
                        .expect("stub llm failed");
                });

                // SAFETY: runs once, on this thread, before the battle server
                // reads its config and before any test observes the URL.
                unsafe {
                    std::env::set_var("LLM_SERVICE_URL", format!("http://{llm_addr}"));
                }

                // Bind to an ephemeral port to avoid collisions with local services.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{addr}"));
                battle_server::run(listener).await.expect("server failed");
            });
        });
        wait_for_server_url_and_readiness(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

// Wait for URL publication and then for the socket to accept TCP connections.
fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    // Retry for a short period to avoid racing server bind/accept.
    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}

async fn stub_completion_handler(Json(request): Json<serde_json::Value>) -> Json<serde_json::Value> {
    let prompt = request["prompt"].as_str().unwrap_or_default();
    Json(serde_json::json!({ "content": stub_completion(prompt) }))
}

// Keyword-driven stand-in for the real classifier/chat endpoint.
fn stub_completion(prompt: &str) -> String {
    let input = prompt
        .lines()
        .find_map(|line| line.strip_prefix("Input:"))
        .unwrap_or("")
        .to_lowercase();

    if prompt.starts_with("From the input, which command is mentioned?") {
        if input.contains("shield") {
            "Shield"
        } else if input.contains("power") {
            "Power"
        } else {
            "NoCommandMentioned"
        }
        .to_string()
    } else if prompt.starts_with("From the input, which direction is mentioned?") {
        if input.contains("left") {
            "MoveLeft"
        } else if input.contains("right") {
            "MoveRight"
        } else {
            "NoDirection"
        }
        .to_string()
    } else {
        // Free-form chat fallback.
        "All systems nominal.".to_string()
    }
}
