use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use unit_converter_lib::core::features::assistant::{
    Assistant, AssistantConfig, AssistantError, GeminiClient, LlmClient,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-test";
const GENERATE_PATH: &str = "/models/gemini-test:generateContent";

fn config(server: &MockServer, timeout: Duration) -> AssistantConfig {
    AssistantConfig {
        api_key: Some("test-key".to_string()),
        model: MODEL.to_string(),
        endpoint: server.uri(),
        timeout,
        temperature: None,
    }
}

/// Endpoint on a port nothing listens on.
fn closed_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn client(server: &MockServer) -> GeminiClient {
    GeminiClient::from_config(&config(server, Duration::from_secs(5))).unwrap()
}

#[tokio::test]
async fn test_generate_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "hello"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "1 mile = "}, {"text": "1.6093 km"}]},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let text = client(&mock_server).generate("hello").await.unwrap();
    assert_eq!(text, "1 mile = 1.6093 km");
}

#[tokio::test]
async fn test_server_error_is_service_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"code": 503, "message": "The model is overloaded", "status": "UNAVAILABLE"}
        })))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).generate("hello").await.unwrap_err();
    assert_eq!(
        err,
        AssistantError::ServiceUnavailable {
            status: Some(503),
            reason: "The model is overloaded".to_string(),
        }
    );
}

#[tokio::test]
async fn test_bad_json_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    assert!(matches!(
        client(&mock_server).generate("hello").await,
        Err(AssistantError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn test_no_candidates_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&mock_server)
        .await;

    assert!(matches!(
        client(&mock_server).generate("hello").await,
        Err(AssistantError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"candidates": []}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = GeminiClient::from_config(&config(&mock_server, Duration::from_millis(200))).unwrap();
    assert!(matches!(
        client.generate("hello").await,
        Err(AssistantError::ServiceUnavailable { status: None, .. })
    ));
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let mock_server = MockServer::start().await;
    let mut cfg = config(&mock_server, Duration::from_secs(2));
    cfg.endpoint = closed_endpoint();

    let client = GeminiClient::from_config(&cfg).unwrap();
    assert!(matches!(
        client.generate("hello").await,
        Err(AssistantError::ServiceUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_assistant_sends_conversion_prompt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "contents": [{"parts": [{"text": "Convert this unit with detailed explanation: 5 feet to meters\nUse this format:\n**Conversion Result**\n[value] [from unit] = [converted value] [to unit]\n**Explanation**\n[brief explanation in simple terms]"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "**Conversion Result**\n5 feet = 1.524 meters"}]}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let assistant = Assistant::from_config(&config(&mock_server, Duration::from_secs(5))).unwrap();
    let answer = assistant.ask("5 feet to meters").await.unwrap();
    assert_eq!(answer.model, MODEL);
    assert!(answer.text.ends_with("5 feet = 1.524 meters"));
}

/// Shared buffer the fmt subscriber writes into.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[tokio::test]
async fn test_api_key_never_logged() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    // Connection refused
    let mock_server = MockServer::start().await;
    let mut cfg = config(&mock_server, Duration::from_secs(2));
    cfg.api_key = Some("SUPER-SECRET-KEY".to_string());
    cfg.endpoint = closed_endpoint();
    let client = GeminiClient::from_config(&cfg).unwrap();
    assert!(client.generate("hi").await.is_err());

    // Server error
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&mock_server)
        .await;
    let mut cfg = config(&mock_server, Duration::from_secs(2));
    cfg.api_key = Some("SUPER-SECRET-KEY".to_string());
    let client = GeminiClient::from_config(&cfg).unwrap();
    assert!(client.generate("hi").await.is_err());

    let captured = logs.contents();
    assert!(captured.contains("Gemini request failed"), "{}", captured);
    assert!(!captured.contains("SUPER-SECRET-KEY"), "{}", captured);
}

#[test]
fn test_missing_key() {
    let cfg = AssistantConfig {
        api_key: None,
        model: MODEL.to_string(),
        endpoint: "http://127.0.0.1:9".to_string(),
        timeout: Duration::from_secs(1),
        temperature: None,
    };
    assert!(matches!(
        GeminiClient::from_config(&cfg),
        Err(AssistantError::MissingApiKey)
    ));
}
