use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use catalog_api::{router, state::ApiState};
use catalog_db::TopicStore;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

/// Header row with the fields every import needs
pub const CSV_HEADER: &str = "id,title,slug,description,tags,difficulty,duration_estimate";

/// App over the built-in catalog
pub fn seeded_app() -> (TestClient, ApiState) {
    app_with(TopicStore::seeded())
}

/// App over an empty catalog
pub fn empty_app() -> (TestClient, ApiState) {
    app_with(TopicStore::new())
}

fn app_with(store: TopicStore) -> (TestClient, ApiState) {
    let state = ApiState::with_store(store);
    let app = router::router().with_state(state.clone());
    (TestClient::new(app), state)
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
            headers,
        }
    }

    /// Send a GET request
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send("GET", uri, None, Body::empty()).await
    }

    /// Send a DELETE request
    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send("DELETE", uri, None, Body::empty()).await
    }

    /// Send a POST request with no body
    pub async fn post(&self, uri: &str) -> TestResponse {
        self.send("POST", uri, None, Body::empty()).await
    }

    /// Send a POST request with a text body
    pub async fn post_text(&self, uri: &str, content_type: &str, body: &str) -> TestResponse {
        self.send("POST", uri, Some(content_type), Body::from(body.to_string()))
            .await
    }

    /// Send a POST request with a JSON body
    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");
        self.post_text(uri, "application/json", &json_body).await
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        content_type: Option<&str>,
        body: Body,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(body).expect("Failed to build request");

        self.request(request).await
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: HeaderMap,
}

impl TestResponse {
    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Body as UTF-8 text
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not UTF-8")
    }

    /// Assert the status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            String::from_utf8_lossy(&self.body)
        );
    }
}
