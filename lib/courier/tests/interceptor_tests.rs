//! Interceptor chain behaviour through a real exchange.

use std::sync::{Arc, Mutex, PoisonError};

use courier::header::AUTHORIZATION;
use courier::interceptor::{
    BasicAuthInterceptor, BearerAuthInterceptor, HeaderInterceptor, JsonContentTypeInterceptor,
};
use courier::{Client, ClientConfig, Custom, Interceptor, Request, Response};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

#[derive(Clone, Default)]
struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    fn push(&self, entry: String) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).push(entry);
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

struct Recording {
    id: usize,
    journal: Journal,
}

impl Interceptor for Recording {
    fn request(&self, _request: &mut Request) {
        self.journal.push(format!("request:{}", self.id));
    }

    fn response(&self, response: &mut Response) {
        self.journal
            .push(format!("response:{}:{}", self.id, response.code()));
    }
}

async fn ok_server() -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    mock_server
}

fn client_for(server: &MockServer) -> Client {
    Client::new(ClientConfig::builder().base_url(server.uri()).build())
}

#[tokio::test]
async fn test_each_interceptor_runs_once_per_call_in_order() {
    let mock_server = ok_server().await;
    let journal = Journal::default();

    let client = client_for(&mock_server);
    for id in 0..3 {
        client.add_interceptor(Recording {
            id,
            journal: journal.clone(),
        });
    }

    for _ in 0..2 {
        let response = client.get("/todos").await;
        assert_eq!(response.code(), 200);

        assert_eq!(
            journal.take(),
            vec![
                "request:0",
                "request:1",
                "request:2",
                "response:0:200",
                "response:1:200",
                "response:2:200",
            ]
        );
    }
}

#[tokio::test]
async fn test_response_hooks_skipped_when_the_server_is_unreachable() {
    let journal = Journal::default();
    let client = Client::new(
        ClientConfig::builder()
            .base_url("http://localhost:1")
            .build(),
    );
    client.add_interceptor(Recording {
        id: 0,
        journal: journal.clone(),
    });

    assert_eq!(client.get("/todos").await.code(), 404);
    assert_eq!(journal.take(), vec!["request:0"]);
}

#[tokio::test]
async fn test_interceptors_added_later_apply_to_later_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/secure"))
        .and(header(AUTHORIZATION, "Bearer late"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/secure"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert_eq!(client.get("/secure").await.code(), 401);

    client.add_interceptor(BearerAuthInterceptor::new("late"));
    assert_eq!(client.get("/secure").await.code(), 200);
}

#[tokio::test]
async fn test_later_interceptor_and_caller_header_overwrite() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header(AUTHORIZATION, "Bearer caller"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(header(AUTHORIZATION, "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.add_interceptor(BearerAuthInterceptor::new("first"));
    client.add_interceptor(BasicAuthInterceptor::new("user", "pass"));
    client.add_interceptor(JsonContentTypeInterceptor::new());

    // The later interceptor wins over the earlier one.
    assert_eq!(client.get("/").await.code(), 202);

    // The caller wins over every interceptor.
    let custom = Custom::new("GET", "/").header(AUTHORIZATION, "Bearer caller");
    assert_eq!(client.execute(custom).await.code(), 200);
}

#[tokio::test]
async fn test_separate_clients_do_not_share_chains() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("X-Client", "first"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let first = client_for(&mock_server);
    let second = client_for(&mock_server);
    first.add_interceptor(HeaderInterceptor::new().header("X-Client", "first"));

    assert_eq!(first.get("/").await.code(), 200);
    assert_eq!(second.get("/").await.code(), 204);
    assert_eq!(first.clone().get("/").await.code(), 200);
}

#[tokio::test]
async fn test_concurrent_calls_and_registration() {
    let mock_server = ok_server().await;
    let journal = Journal::default();
    let client = client_for(&mock_server);

    let mut tasks = Vec::new();
    for id in 0..8 {
        let client = client.clone();
        let journal = journal.clone();
        tasks.push(tokio::spawn(async move {
            client.add_interceptor(Recording { id, journal });
            client.get("/").await.code()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.expect("task"), 200);
    }

    assert_eq!(client.interceptor_count(), 8);
    journal.take();
    client.get("/").await;
    assert_eq!(journal.take().len(), 16);
}
