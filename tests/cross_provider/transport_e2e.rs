use llm_endpoint::{EndpointClient, Error, ExecutorOptions, Operation, Transport};
use serde_json::{json, Map};
use wiremock::matchers::{body_json, body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::providers::{
    chat_response, completion_response, direct::DirectTestSetup, embedding_response,
    gateway::GatewayTestSetup, ProviderTestSetup,
};

const TRANSPORTS: [Transport; 2] = [Transport::Rest, Transport::ClientLibrary];

fn client<T: ProviderTestSetup>(server: &MockServer, transport: Transport) -> EndpointClient {
    EndpointClient::new(T::create_endpoint(&server.uri()), transport, ExecutorOptions::default())
}

/// Body the endpoint is expected to send, for the REST transport where it is exact.
fn expected_body<T: ProviderTestSetup>(input_key: &str, input: serde_json::Value) -> serde_json::Value {
    let config = T::get_config();
    let mut body = json!({ input_key: input, "max_tokens": 16 });
    if config.sends_model {
        body["model"] = json!(config.model);
    }
    body
}

fn extra() -> Map<String, serde_json::Value> {
    let mut extra = Map::new();
    extra.insert("max_tokens".to_string(), json!(16));
    extra
}

async fn run_completion_test<T: ProviderTestSetup>(transport: Transport) {
    let config = T::get_config();
    let server = MockServer::start().await;

    let mock = T::match_request(Mock::given(method("POST")), Operation::Completion);
    let mock = match transport {
        Transport::Rest => mock.and(body_json(expected_body::<T>("prompt", json!("Say hi")))),
        Transport::ClientLibrary => mock.and(body_partial_json(json!({ "prompt": "Say hi", "max_tokens": 16 }))),
    };
    mock.respond_with(ResponseTemplate::new(200).set_body_json(completion_response("Hi!")))
        .expect(1)
        .mount(&server)
        .await;

    let text = client::<T>(&server, transport)
        .completion("Say hi", &extra())
        .await
        .unwrap_or_else(|e| panic!("{} over {transport}: {e}", config.name));
    assert_eq!(text, "Hi!");
}

async fn run_chat_test<T: ProviderTestSetup>(transport: Transport) {
    let config = T::get_config();
    let server = MockServer::start().await;

    let mock = T::match_request(Mock::given(method("POST")), Operation::ChatCompletion);
    let mock = match transport {
        Transport::Rest => mock.and(body_json(expected_body::<T>(
            "messages",
            json!([{ "role": "user", "content": "Hello" }]),
        ))),
        Transport::ClientLibrary => mock,
    };
    mock.respond_with(ResponseTemplate::new(200).set_body_json(chat_response("Hello back")))
        .expect(1)
        .mount(&server)
        .await;

    let message = client::<T>(&server, transport)
        .chat_completion("Hello", &extra())
        .await
        .unwrap_or_else(|e| panic!("{} over {transport}: {e}", config.name));
    assert_eq!(message.role, "assistant");
    assert_eq!(message.content.as_deref(), Some("Hello back"));
}

async fn run_embedding_test<T: ProviderTestSetup>(transport: Transport) {
    let config = T::get_config();
    let server = MockServer::start().await;

    let mock = T::match_request(Mock::given(method("POST")), Operation::Embedding);
    let mock = match transport {
        Transport::Rest => mock.and(body_json(expected_body::<T>("input", json!("vector me")))),
        Transport::ClientLibrary => mock.and(body_partial_json(json!({ "input": "vector me" }))),
    };
    mock.respond_with(ResponseTemplate::new(200).set_body_json(embedding_response(&[0.25, -0.5, 1.0])))
        .expect(1)
        .mount(&server)
        .await;

    let embedding = client::<T>(&server, transport)
        .embedding("vector me", &extra())
        .await
        .unwrap_or_else(|e| panic!("{} over {transport}: {e}", config.name));
    assert_eq!(embedding, vec![0.25, -0.5, 1.0]);
}

async fn run_unauthorized_test<T: ProviderTestSetup>() {
    let server = MockServer::start().await;
    T::match_request(Mock::given(method("POST")), Operation::Completion)
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":{"message":"Incorrect API key provided"}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = T::create_endpoint(&server.uri());
    let request = endpoint.request(Operation::Completion, "Say hi", &extra());
    let client = EndpointClient::new(endpoint, Transport::Rest, ExecutorOptions::default());

    let err = client.completion("Say hi", &extra()).await.unwrap_err();
    let Error::Http { status, diagnostics } = &err else {
        panic!("expected HTTP error, got {err:?}");
    };
    assert_eq!(*status, Some(401));
    assert_eq!(diagnostics.status, Some(401));
    assert_eq!(diagnostics.request_body, serde_json::to_string(&request.body).unwrap());
    assert_eq!(diagnostics.url, request.url);
    assert_eq!(diagnostics.headers, request.headers);
    assert!(diagnostics.response_text.contains("Incorrect API key"));
}

#[tokio::test]
async fn test_completion_all_providers_and_transports() {
    for transport in TRANSPORTS {
        run_completion_test::<DirectTestSetup>(transport).await;
        run_completion_test::<GatewayTestSetup>(transport).await;
    }
}

#[tokio::test]
async fn test_chat_completion_all_providers_and_transports() {
    for transport in TRANSPORTS {
        run_chat_test::<DirectTestSetup>(transport).await;
        run_chat_test::<GatewayTestSetup>(transport).await;
    }
}

#[tokio::test]
async fn test_embedding_all_providers_and_transports() {
    for transport in TRANSPORTS {
        run_embedding_test::<DirectTestSetup>(transport).await;
        run_embedding_test::<GatewayTestSetup>(transport).await;
    }
}

#[tokio::test]
async fn test_unauthorized_keeps_diagnostics() {
    run_unauthorized_test::<DirectTestSetup>().await;
    run_unauthorized_test::<GatewayTestSetup>().await;
}
