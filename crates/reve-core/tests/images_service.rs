//! Image endpoints end to end against a mock server


use reve_core::images::{error_count, success_count};
use reve_core::{
    image_ref, AspectRatio, CallOptions, Client, CreateParams, EditParams, Error, ErrorCode,
    Image, OutputFormat, Postprocess, RemixParams, ValidationError,
};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_support::*;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_create_sends_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/image/create"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .and(header("user-agent", "reve-tests/1.0"))
        .and(body_json(json!({
            "prompt": "a lighthouse at dusk",
            "aspect_ratio": "16:9",
            "postprocessing": [{"process": "remove_background"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_body("aGk=")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 0);
    let params = create_params()
        .with_aspect_ratio(AspectRatio::Ratio16x9)
        .with_postprocess(Postprocess::remove_background());
    let result = client.images().create(&params).await.unwrap();

    assert_eq!(result.bytes().unwrap(), b"hi");
    assert_eq!(result.version, "reve-create@20250915");
    assert_eq!(result.request_id, "rid-body");
}

#[tokio::test]
async fn test_breadcrumb_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/image/create"))
        .and(query_param("breadcrumb", "job-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_body("aGk=")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 0);
    let options = CallOptions::new().with_breadcrumb("job-7");
    client
        .images()
        .create_with(&create_params(), &options)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_request_id_falls_back_to_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-reve-request-id", "rid-header")
                .set_body_json(json!({"image": "aGk=", "credits_used": 18})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, 0);
    let result = client.images().create(&create_params()).await.unwrap();
    assert_eq!(result.request_id, "rid-header");
}

#[tokio::test]
async fn test_edit_and_remix_paths() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/image/edit"))
        .and(body_partial_json(json!({
            "edit_instruction": "add a hat",
            "reference_image": "aGVsbG8="
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_body("ZWRpdA==")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/image/remix"))
        .and(body_partial_json(json!({
            "reference_images": ["aGVsbG8=", "aGk="],
            "version": "reve-remix-fast@20251030"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_body("cmVtaXg=")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 0);
    let hello = Image::from_bytes(b"hello".to_vec());

    let edited = client
        .images()
        .edit(&EditParams::new("add a hat", hello.clone()))
        .await
        .unwrap();
    assert_eq!(edited.bytes().unwrap(), b"edit");

    let prompt = format!("{} standing next to {}", image_ref(0), image_ref(1));
    let remix = RemixParams::new(prompt, vec![hello, Image::from_base64("aGk=")])
        .with_version(reve_core::ModelVersion::RemixFast20251030);
    let remixed = client.images().remix(&remix).await.unwrap();
    assert_eq!(remixed.bytes().unwrap(), b"remix");
}

#[tokio::test]
async fn test_raw_mode_reads_header_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/image/create"))
        .and(header("accept", "image/webp"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/webp")
                .insert_header("x-reve-version", "reve-create@20250915")
                .insert_header("x-reve-content-violation", "false")
                .insert_header("x-reve-request-id", "rid-raw")
                .insert_header("x-reve-credits-used", "18")
                .insert_header("x-reve-credits-remaining", "not-a-number")
                .set_body_bytes(vec![0x52, 0x49, 0x46, 0x46]),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, 0);
    let raw = client
        .images()
        .create_raw(&create_params(), OutputFormat::Webp)
        .await
        .unwrap();

    assert_eq!(raw.data, vec![0x52, 0x49, 0x46, 0x46]);
    assert_eq!(raw.content_type, "image/webp");
    assert_eq!(raw.version, "reve-create@20250915");
    assert!(!raw.content_violation);
    assert_eq!(raw.request_id, "rid-raw");
    assert_eq!(raw.credits_used, 18);
    assert_eq!(raw.credits_remaining, 0);
}

#[tokio::test]
async fn test_raw_mode_missing_credit_headers_are_zero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
        .mount(&server)
        .await;

    let client = client_for(&server, 0);
    let raw = client
        .images()
        .create_raw(&create_params(), OutputFormat::Png)
        .await
        .unwrap();

    assert_eq!(raw.size(), 3);
    assert_eq!(raw.credits_used, 0);
    assert_eq!(raw.credits_remaining, 0);
    assert!(raw.request_id.is_empty());
}

#[tokio::test]
async fn test_raw_mode_error_header_fails_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-reve-error-code", "CONTENT_POLICY_VIOLATION")
                .set_body_json(error_body("CONTENT_POLICY_VIOLATION", "blocked")),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, 3);
    let err = client
        .images()
        .create_raw(&create_params(), OutputFormat::Png)
        .await
        .unwrap_err();

    let api = err.api().expect("api error");
    assert_eq!(api.code, Some(ErrorCode::ContentPolicyViolation));
    assert!(api.is_content_violation());
    assert_eq!(api.status, 200);
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_raw_mode_error_code_from_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-reve-error-code", "CONTENT_POLICY_VIOLATION")
                .set_body_bytes(Vec::new()),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, 3);
    let err = client
        .images()
        .create_raw(&create_params(), OutputFormat::Webp)
        .await
        .unwrap_err();

    let api = err.api().expect("api error");
    assert!(api.is_content_violation());
    assert_eq!(api.message, "OK");
}

#[tokio::test]
async fn test_raw_mode_retries_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(504))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![9, 9]))
        .mount(&server)
        .await;

    let client = client_for(&server, 2);
    let raw = client
        .images()
        .create_raw(&create_params(), OutputFormat::Jpeg)
        .await
        .unwrap();

    assert_eq!(raw.data, vec![9, 9]);
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_validation_failures_send_nothing() {
    let server = MockServer::start().await;
    let client = client_for(&server, 3);

    let err = client.images().create(&CreateParams::new("")).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::EmptyPrompt)));
    assert!(err.to_string().contains("prompt cannot be empty"));

    let err = client
        .images()
        .remix_raw(&RemixParams::new("mix", Vec::new()), OutputFormat::Png)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::NoReferenceImages)));

    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_batch_keeps_input_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"prompt": "slow"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(image_body("c2xvdw=="))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"prompt": "fast"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_body("ZmFzdA==")))
        .mount(&server)
        .await;

    let client = client_for(&server, 0);
    let params = vec![
        CreateParams::new("slow"),
        CreateParams::new(""),
        CreateParams::new("fast"),
    ];
    let results = client.images().create_batch(&params, 3).await;

    let indices: Vec<_> = results.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(success_count(&results), 2);
    assert_eq!(error_count(&results), 1);
    assert_eq!(results[0].outcome.as_ref().unwrap().image, "c2xvdw==");
    assert_eq!(results[2].outcome.as_ref().unwrap().image, "ZmFzdA==");
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_debug_logger_sees_each_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_body("aGk=")))
        .mount(&server)
        .await;

    let lines = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = lines.clone();
    let client = Client::builder("test-key")
        .base_url(server.uri())
        .retry(2, Duration::from_millis(1), Duration::from_millis(5))
        .debug(true)
        .logger(move |line: &str| sink.lock().unwrap().push(line.to_string()))
        .no_proxy()
        .build()
        .unwrap();

    client.images().create(&create_params()).await.unwrap();

    let lines = lines.lock().unwrap();
    let requests = lines.iter().filter(|l| l.starts_with("Request: POST")).count();
    assert_eq!(requests, 2);
    assert!(lines.iter().any(|l| l == "Response: status=500, size=0"));
}
