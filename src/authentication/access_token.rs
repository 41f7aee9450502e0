use crate::routes::AUTHENTICATION_PATH;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Failed to reach the authentication endpoint.")]
    Transport(#[from] reqwest::Error),
    #[error("Authentication was rejected with status {status}.")]
    Rejected { status: StatusCode, body: String },
    #[error("Authentication response is not valid JSON.")]
    MalformedResponse(#[source] serde_json::Error),
    #[error("Authentication response carries no access token.")]
    MissingAccessToken,
}

#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: Secret<String>,
}

/// Bearer credential for the story API.
#[derive(Clone, Debug)]
pub struct AccessToken(Secret<String>);

impl AccessToken {
    pub fn new(token: Secret<String>) -> Self {
        Self(token)
    }
}

impl ExposeSecret<String> for AccessToken {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}

#[derive(serde::Serialize)]
struct AuthenticationRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthenticationResponse {
    access_token: Option<String>,
}

#[tracing::instrument(
    name = "Fetch access token",
    skip(http_client, credentials),
    fields(username = %credentials.username)
)]
pub async fn fetch_access_token(
    http_client: &Client,
    base_url: &str,
    credentials: &Credentials,
) -> Result<AccessToken, AuthError> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), AUTHENTICATION_PATH);
    let request_body = AuthenticationRequest {
        username: &credentials.username,
        password: credentials.password.expose_secret(),
    };
    let response = http_client.post(&url).json(&request_body).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::error!(%status, "Authentication endpoint rejected the credentials");
        return Err(AuthError::Rejected { status, body });
    }

    let parsed: AuthenticationResponse =
        serde_json::from_str(&body).map_err(AuthError::MalformedResponse)?;
    parsed
        .access_token
        .filter(|token| !token.trim().is_empty())
        .map(|token| AccessToken::new(Secret::new(token)))
        .ok_or(AuthError::MissingAccessToken)
}
