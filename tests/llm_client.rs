// file: tests/llm_client.rs
// description: chat-completions client against a local stub endpoint

use inbox_triage::{
    CancellationToken, ClassificationMode, ClassificationSource, ClassifierConfig, IngestConfig,
    IngestionPipeline, LlmClassifier, TriageCategory, TriageError, TriageLevel,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

struct StubResponse {
    status: &'static str,
    body: String,
}

fn chat_reply(content: &str) -> StubResponse {
    StubResponse {
        status: "200 OK",
        body: json!({
            "id": "chatcmpl-test",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        })
        .to_string(),
    }
}

/// Serves `responses` to consecutive connections and returns the raw requests seen.
async fn stub_endpoint(responses: Vec<StubResponse>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for response in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut socket).await);

            let raw = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                response.status,
                response.body.len(),
                response.body
            );
            socket.write_all(raw.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
        requests
    });

    (format!("http://{addr}/v1/chat/completions"), handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let body_len = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        if buf.len() >= header_end + 4 + body_len {
            break;
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn config_for(endpoint: String) -> ClassifierConfig {
    ClassifierConfig {
        endpoint,
        model: "test-model".to_string(),
        timeout_secs: 5,
        api_key: Some("sk-test".to_string()),
        use_system_proxy: false,
        ..ClassifierConfig::default()
    }
}

#[tokio::test]
async fn successful_reply_is_parsed() {
    let reply = "Here you go:\n{\"triage_level\": \"Urgent\", \"triage_category\": \"Lab Result\", \"confidence\": 0.93}";
    let (endpoint, server) = stub_endpoint(vec![chat_reply(reply)]).await;
    let classifier = LlmClassifier::new(config_for(endpoint));

    let result = classifier
        .classify_message("Potassium", "Lab called about critical potassium")
        .await
        .unwrap();

    assert_eq!(result.level, TriageLevel::Urgent);
    assert_eq!(result.category, TriageCategory::LabResult);
    assert_eq!(result.source, ClassificationSource::External);
    assert!((result.confidence - 0.93).abs() < 1e-6);

    let requests = server.await.unwrap();
    let request = &requests[0];
    assert!(request.starts_with("POST /v1/chat/completions"));
    assert!(request.to_lowercase().contains("authorization: bearer sk-test"));
    assert!(request.contains("\"model\":\"test-model\""));
    assert!(request.contains("\"temperature\":0.2"));
    assert!(request.contains("Subject: Potassium"));
}

#[tokio::test]
async fn error_status_carries_remote_message() {
    let (endpoint, server) = stub_endpoint(vec![StubResponse {
        status: "401 Unauthorized",
        body: json!({ "error": { "message": "Incorrect API key provided" } }).to_string(),
    }])
    .await;
    let classifier = LlmClassifier::new(config_for(endpoint));

    let err = classifier.classify_message("a", "b").await.unwrap_err();

    match err {
        TriageError::Endpoint(message) => {
            assert!(message.contains("401"));
            assert!(message.contains("Incorrect API key provided"));
        }
        other => panic!("unexpected error: {other}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn reply_without_json_is_malformed() {
    let (endpoint, server) =
        stub_endpoint(vec![chat_reply("This looks urgent to me.")]).await;
    let classifier = LlmClassifier::new(config_for(endpoint));

    let err = classifier.classify_message("a", "b").await.unwrap_err();

    assert!(matches!(err, TriageError::MalformedResponse(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn external_first_without_key_runs_rule_only() {
    let pipeline = IngestionPipeline::with_external(
        IngestConfig {
            show_progress: false,
            ..IngestConfig::default()
        },
        LlmClassifier::new(ClassifierConfig::default()),
    );
    assert_eq!(pipeline.effective_mode(), ClassificationMode::RuleOnly);

    let text = "\
message_id,subject,message,datetime
1,Refill,Please refill my prescription,2023-05-15
2,Pain,Patient has severe chest pain,2023-05-15
";
    let report = pipeline.run(text, &CancellationToken::new()).await.unwrap();

    assert_eq!(report.effective_mode, ClassificationMode::RuleOnly);
    assert_eq!(report.stats.external_classified, 0);
    assert_eq!(report.stats.rule_classified, 2);
    assert!(
        report
            .messages
            .iter()
            .all(|m| m.classified_by == ClassificationSource::Rules)
    );
    assert_eq!(report.messages[0].triage_category, TriageCategory::Medication);
    assert_eq!(report.messages[1].triage_level, TriageLevel::Urgent);
}

#[tokio::test]
async fn failed_calls_fall_back_to_rules_during_ingest() {
    let failure = || StubResponse {
        status: "500 Internal Server Error",
        body: json!({ "error": { "message": "overloaded" } }).to_string(),
    };
    let (endpoint, server) = stub_endpoint(vec![
        chat_reply(r#"{"triage_level": "Low", "triage_category": "Other"}"#),
        failure(),
    ])
    .await;

    let pipeline = IngestionPipeline::with_external(
        IngestConfig {
            show_progress: false,
            ..IngestConfig::default()
        },
        LlmClassifier::new(config_for(endpoint)),
    );
    let text = "\
message_id,subject,message,datetime
1,Hello,Just checking in,2023-05-15
2,Refill,Need a refill of my medication,2023-05-15
";

    let report = pipeline.run(text, &CancellationToken::new()).await.unwrap();

    assert_eq!(report.effective_mode, ClassificationMode::ExternalFirst);
    assert_eq!(report.messages[0].classified_by, ClassificationSource::External);
    assert_eq!(report.messages[0].triage_level, TriageLevel::Low);
    assert_eq!(report.messages[1].classified_by, ClassificationSource::RuleFallback);
    assert_eq!(report.messages[1].triage_category, TriageCategory::Medication);
    assert_eq!(report.stats.external_classified, 1);
    assert_eq!(report.stats.fallback_classified, 1);
    assert_eq!(server.await.unwrap().len(), 2);
}
