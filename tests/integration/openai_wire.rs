//! OpenAI-compatible client against a one-shot local HTTP server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;
use std::time::Duration;
use whodunit::error::ApiError;
use whodunit::gateway::{CompletionGateway, OpenAIGateway};

/// Serve exactly one request with `status` and `body`; the handle yields the raw request.
fn serve_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/v1", listener.local_addr().unwrap());
    let body = body.to_string();

    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut head = String::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
            head.push_str(&line);
            if line == "\r\n" || line.is_empty() {
                break;
            }
        }
        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let reason = match status {
            200 => "OK",
            401 => "Unauthorized",
            429 => "Too Many Requests",
            _ => "Error",
        };
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        );
        let mut stream = stream;
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        head + &String::from_utf8(request_body).unwrap()
    });

    (base_url, handle)
}

fn client(base_url: String) -> OpenAIGateway {
    OpenAIGateway::new(
        "gpt-4o-mini".to_string(),
        "test-key".to_string(),
        base_url,
        0.7,
        Duration::from_secs(5),
        Duration::from_secs(10),
    )
    .unwrap()
}

fn completion(content: &str) -> String {
    serde_json::json!({
        "model": "gpt-4o-mini",
        "choices": [{
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 34}
    })
    .to_string()
}

#[tokio::test]
async fn test_successful_completion_and_request_shape() {
    let (base_url, server) = serve_once(200, &completion(r#"{"key_twist": "twins"}"#));

    let text = client(base_url)
        .complete("You are a mystery writer.", "Create a premise.")
        .await
        .unwrap();
    assert_eq!(text, r#"{"key_twist": "twins"}"#);

    let request = server.join().unwrap();
    assert!(request.starts_with("POST /v1/chat/completions"));
    assert!(request.to_lowercase().contains("authorization: bearer test-key"));

    let body_start = request.find("\r\n\r\n").unwrap() + 4;
    let body: serde_json::Value = serde_json::from_str(&request[body_start..]).unwrap();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["response_format"]["type"], "json_object");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], "You are a mystery writer.");
    assert_eq!(body["messages"][1]["role"], "user");
}

#[tokio::test]
async fn test_status_mapping() {
    let cases: [(u16, fn(&ApiError) -> bool); 3] = [
        (401, |e| matches!(e, ApiError::ProviderAuthFailed(_))),
        (429, |e| matches!(e, ApiError::ProviderRateLimit(_))),
        (503, |e| matches!(e, ApiError::GenerationUnavailable(_))),
    ];

    for (status, expected) in cases {
        let (base_url, server) = serve_once(status, r#"{"error": {"message": "nope"}}"#);
        let err = client(base_url).complete("a", "b").await.unwrap_err();
        assert!(expected(&err), "status {} mapped to {:?}", status, err);
        server.join().unwrap();
    }
}

#[tokio::test]
async fn test_empty_choices_is_provider_error() {
    let body = serde_json::json!({"model": "gpt-4o-mini", "choices": []}).to_string();
    let (base_url, server) = serve_once(200, &body);

    let err = client(base_url).complete("a", "b").await.unwrap_err();
    assert!(matches!(err, ApiError::ProviderError(_)));
    server.join().unwrap();
}
