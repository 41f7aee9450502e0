use crate::authentication::{AccessToken, AuthError, Credentials, fetch_access_token};
use crate::configuration::ApiSettings;
use crate::routes::{ALL_STORIES_PATH, CREATE_STORY_PATH, delete_story_path, edit_story_path};
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;

/// HTTP client for the story API.
///
/// Every request it issues carries the access token it was built with.
/// Dropping the client releases its connection pool.
#[derive(Clone, Debug)]
pub struct StoryClient {
    base_url: String,
    http_client: Client,
    access_token: AccessToken,
}

/// Status and raw body of a story API response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T>(&self) -> Result<T, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_str(&self.body)
    }
}

impl StoryClient {
    pub fn new(base_url: String, http_client: Client, access_token: AccessToken) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            access_token,
        }
    }

    /// Obtains an access token with `credentials` and returns a client
    /// that presents it on every request.
    #[tracing::instrument(name = "Authenticating story client", skip_all)]
    pub async fn authenticate(
        settings: &ApiSettings,
        credentials: &Credentials,
    ) -> Result<Self, AuthError> {
        let http_client = settings.http_client()?;
        let access_token =
            fetch_access_token(&http_client, &settings.base_url, credentials).await?;
        tracing::info!("Obtained access token for {}", credentials.username);
        Ok(Self::new(settings.base_url.clone(), http_client, access_token))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[tracing::instrument(name = "Create story", skip(self, body))]
    pub async fn create_story<Body>(&self, body: &Body) -> Result<ApiResponse, reqwest::Error>
    where
        Body: serde::Serialize,
    {
        self.send(self.http_client.post(self.url(CREATE_STORY_PATH)).json(body))
            .await
    }

    #[tracing::instrument(name = "Edit story", skip(self, body))]
    pub async fn edit_story<Body>(
        &self,
        story_id: &str,
        body: &Body,
    ) -> Result<ApiResponse, reqwest::Error>
    where
        Body: serde::Serialize,
    {
        self.send(
            self.http_client
                .put(self.url(&edit_story_path(story_id)))
                .json(body),
        )
        .await
    }

    #[tracing::instrument(name = "Get all stories", skip(self))]
    pub async fn get_all_stories(&self) -> Result<ApiResponse, reqwest::Error> {
        self.send(self.http_client.get(self.url(ALL_STORIES_PATH))).await
    }

    #[tracing::instrument(name = "Delete story", skip(self))]
    pub async fn delete_story(&self, story_id: &str) -> Result<ApiResponse, reqwest::Error> {
        self.send(self.http_client.delete(self.url(&delete_story_path(story_id))))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<ApiResponse, reqwest::Error> {
        let response = request
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach the story API: {:?}", e);
                e
            })?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%status, "Story API responded");
        Ok(ApiResponse { status, body })
    }
}
