use crate::test_data::{TEST_ACCESS_TOKEN, TEST_STORY_ID};
use std::sync::LazyLock;
use story_spoiler::configuration::{Settings, get_configuration};
use story_spoiler::story_client::StoryClient;
use story_spoiler::telemetry::{get_subscriber, init_subscriber};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

// Ensure that the `tracing` stack is only initialised once using `LazyLock`
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    // The sink is part of the type returned by `get_subscriber`, hence the two branches.
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApi {
    pub story_api: MockServer,
    pub configuration: Settings,
}

impl TestApi {
    /// Authenticates against the mocked service.
    pub async fn client(&self) -> StoryClient {
        StoryClient::authenticate(
            &self.configuration.api,
            &self.configuration.credentials.credentials(),
        )
        .await
        .expect("Failed to authenticate against the mock story API.")
    }

    pub async fn received_requests(&self) -> Vec<Request> {
        self.story_api
            .received_requests()
            .await
            .expect("Request recording is disabled.")
    }
}

/// Starts a mock story service that only knows how to authenticate.
pub async fn spawn_story_api() -> TestApi {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    LazyLock::force(&TRACING);

    let story_api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/User/Authentication"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "accessToken": TEST_ACCESS_TOKEN })),
        )
        .mount(&story_api)
        .await;

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.api.base_url = story_api.uri();
        c
    };

    TestApi {
        story_api,
        configuration,
    }
}

/// Starts a mock story service that behaves like the live deployment.
pub async fn spawn_well_behaved_story_api() -> TestApi {
    let app = spawn_story_api().await;
    mount_well_behaved_story_endpoints(&app.story_api).await;
    app
}

struct StoryBodyMatcher;

impl wiremock::Match for StoryBodyMatcher {
    fn matches(&self, request: &Request) -> bool {
        // Check that all the mandatory fields are populated
        // without inspecting the field values
        match serde_json::from_slice::<serde_json::Value>(&request.body) {
            Ok(body) => {
                body.get("Title").is_some()
                    && body.get("Description").is_some()
                    && body.get("Url").is_some()
            }
            Err(_) => false,
        }
    }
}

fn authorized() -> wiremock::matchers::HeaderExactMatcher {
    header("Authorization", format!("Bearer {}", TEST_ACCESS_TOKEN).as_str())
}

pub fn message_response(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(serde_json::json!({ "msg": message }))
}

async fn mount_well_behaved_story_endpoints(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/Story/Create"))
        .and(authorized())
        .and(StoryBodyMatcher)
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "storyId": TEST_STORY_ID,
            "msg": "Successfully created!"
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/Story/Create"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "title": "One or more validation errors occurred.",
            "status": 400
        })))
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("/api/Story/Edit/{}", TEST_STORY_ID)))
        .and(authorized())
        .and(StoryBodyMatcher)
        .respond_with(message_response(200, "Successfully edited"))
        .mount(server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/Story/Edit/123"))
        .respond_with(message_response(404, "No spoilers..."))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/Story/All"))
        .and(authorized())
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": TEST_STORY_ID,
            "title": "edited story",
            "description": "Test story description",
            "url": ""
        }])))
        .mount(server)
        .await;

    // A story can only be deleted once
    Mock::given(method("DELETE"))
        .and(path(format!("/api/Story/Delete/{}", TEST_STORY_ID)))
        .and(authorized())
        .respond_with(message_response(200, "Deleted successfully!"))
        .up_to_n_times(1)
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/Story/Delete/{}", TEST_STORY_ID)))
        .respond_with(message_response(400, "Unable to delete this story spoiler!"))
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/Story/Delete/123"))
        .respond_with(message_response(400, "Unable to delete this story spoiler!"))
        .mount(server)
        .await;
}

/// Mounts a single mock with a higher priority than the well-behaved ones.
pub async fn mount_override(
    server: &MockServer,
    http_method: &str,
    at: &str,
    response: ResponseTemplate,
) {
    Mock::given(method(http_method))
        .and(path(at))
        .respond_with(response)
        .with_priority(1)
        .mount(server)
        .await;
}
