//! Individual checks against the story API.
//!
//! Each check issues exactly one request and then validates the status code
//! followed, where applicable, by the response envelope.

use crate::domain::{CreateStoryResponse, MessageResponse, StoryId, StoryPayload};
use crate::story_client::{ApiResponse, StoryClient};
use reqwest::StatusCode;

pub const STORY_CREATED_MESSAGE: &str = "Successfully created!";
pub const STORY_EDITED_MESSAGE: &str = "Successfully edited";
pub const STORY_DELETED_MESSAGE: &str = "Deleted successfully!";
pub const STORY_NOT_FOUND_MESSAGE: &str = "No spoilers...";
pub const STORY_NOT_DELETED_MESSAGE: &str = "Unable to delete this story spoiler!";

/// Assumed never to exist on the remote service
pub const NONEXISTENT_STORY_ID: &str = "123";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    CreateStory,
    EditStory,
    GetAllStories,
    DeleteStory,
    DeleteDeletedStory,
    CreateStoryWithoutRequiredFields,
    EditNonexistentStory,
    DeleteNonexistentStory,
}

impl Check {
    pub fn as_str(&self) -> &'static str {
        match self {
            Check::CreateStory => "create_story",
            Check::EditStory => "edit_story",
            Check::GetAllStories => "get_all_stories",
            Check::DeleteStory => "delete_story",
            Check::DeleteDeletedStory => "delete_deleted_story",
            Check::CreateStoryWithoutRequiredFields => "create_story_without_required_fields",
            Check::EditNonexistentStory => "edit_nonexistent_story",
            Check::DeleteNonexistentStory => "delete_nonexistent_story",
        }
    }
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CheckFailure {
    #[error("Expected status {expected}, got {actual}.")]
    UnexpectedStatus {
        expected: StatusCode,
        actual: StatusCode,
        body: String,
    },
    #[error("Response body is not valid JSON.")]
    MalformedBody(#[source] serde_json::Error),
    #[error("Response has no `{0}` field.")]
    MissingField(&'static str),
    #[error("Expected message {expected:?}, got {actual:?}.")]
    UnexpectedMessage {
        expected: &'static str,
        actual: String,
    },
    #[error("Story list is empty.")]
    EmptyStoryList,
    #[error("Failed to reach the story API.")]
    Transport(#[from] reqwest::Error),
    /// The service assigned an id, but the response failed another assertion
    #[error("Story {story_id} was created, but: {source}")]
    CreatedWithFailure {
        story_id: StoryId,
        source: Box<CheckFailure>,
    },
}

impl CheckFailure {
    /// Id of a story that exists despite the failure and still needs cleaning up.
    pub fn created_story_id(&self) -> Option<&StoryId> {
        match self {
            CheckFailure::CreatedWithFailure { story_id, .. } => Some(story_id),
            _ => None,
        }
    }
}

fn expect_status(response: &ApiResponse, expected: StatusCode) -> Result<(), CheckFailure> {
    if response.status != expected {
        return Err(CheckFailure::UnexpectedStatus {
            expected,
            actual: response.status,
            body: response.body.clone(),
        });
    }
    Ok(())
}

fn expect_message(msg: Option<String>, expected: &'static str) -> Result<(), CheckFailure> {
    let actual = msg.ok_or(CheckFailure::MissingField("msg"))?;
    if actual != expected {
        return Err(CheckFailure::UnexpectedMessage { expected, actual });
    }
    Ok(())
}

fn expect_message_response(
    response: &ApiResponse,
    status: StatusCode,
    message: &'static str,
) -> Result<(), CheckFailure> {
    expect_status(response, status)?;
    let body: MessageResponse = response.json().map_err(CheckFailure::MalformedBody)?;
    expect_message(body.msg, message)
}

fn assigned_story_id(response: &ApiResponse) -> Option<StoryId> {
    response
        .json::<CreateStoryResponse>()
        .ok()?
        .story_id
        .and_then(|id| StoryId::parse(id).ok())
}

fn expect_created(response: &ApiResponse) -> Result<StoryId, CheckFailure> {
    expect_status(response, StatusCode::CREATED)?;
    let body: CreateStoryResponse = response.json().map_err(CheckFailure::MalformedBody)?;
    let story_id = body
        .story_id
        .and_then(|id| StoryId::parse(id).ok())
        .ok_or(CheckFailure::MissingField("storyId"))?;
    expect_message(body.msg, STORY_CREATED_MESSAGE)?;
    Ok(story_id)
}

/// Creates a story and returns the identifier the service assigned to it.
///
/// If the response carries an id but fails another assertion, the failure is
/// `CheckFailure::CreatedWithFailure` so callers can still delete the story.
#[tracing::instrument(name = "Check: create story", skip(client))]
pub async fn create_story(
    client: &StoryClient,
    payload: &StoryPayload,
) -> Result<StoryId, CheckFailure> {
    let response = client.create_story(payload).await?;
    expect_created(&response).map_err(|failure| match assigned_story_id(&response) {
        Some(story_id) => CheckFailure::CreatedWithFailure {
            story_id,
            source: Box::new(failure),
        },
        None => failure,
    })
}

#[tracing::instrument(name = "Check: edit story", skip(client))]
pub async fn edit_story(
    client: &StoryClient,
    story_id: &StoryId,
    payload: &StoryPayload,
) -> Result<(), CheckFailure> {
    let response = client.edit_story(story_id.as_ref(), payload).await?;
    expect_message_response(&response, StatusCode::OK, STORY_EDITED_MESSAGE)
}

/// Lists all stories and returns how many there are.
///
/// The list is expected to be non-empty. That holds whenever a story was
/// created beforehand, but is not guaranteed by the service in general.
#[tracing::instrument(name = "Check: get all stories", skip(client))]
pub async fn get_all_stories(client: &StoryClient) -> Result<usize, CheckFailure> {
    let response = client.get_all_stories().await?;
    expect_status(&response, StatusCode::OK)?;
    let stories: Vec<serde_json::Value> = response.json().map_err(CheckFailure::MalformedBody)?;
    if stories.is_empty() {
        return Err(CheckFailure::EmptyStoryList);
    }
    Ok(stories.len())
}

#[tracing::instrument(name = "Check: delete story", skip(client))]
pub async fn delete_story(client: &StoryClient, story_id: &StoryId) -> Result<(), CheckFailure> {
    let response = client.delete_story(story_id.as_ref()).await?;
    expect_message_response(&response, StatusCode::OK, STORY_DELETED_MESSAGE)
}

/// Deletes a story that was already deleted. Only the status is checked.
#[tracing::instrument(name = "Check: delete deleted story", skip(client))]
pub async fn delete_deleted_story(
    client: &StoryClient,
    story_id: &StoryId,
) -> Result<(), CheckFailure> {
    let response = client.delete_story(story_id.as_ref()).await?;
    expect_status(&response, StatusCode::BAD_REQUEST)
}

#[tracing::instrument(name = "Check: create story without required fields", skip(client))]
pub async fn create_story_without_required_fields(
    client: &StoryClient,
) -> Result<(), CheckFailure> {
    let body = serde_json::json!({
        "Name": "",
        "Description": ""
    });
    let response = client.create_story(&body).await?;
    expect_status(&response, StatusCode::BAD_REQUEST)
}

#[tracing::instrument(name = "Check: edit nonexistent story", skip(client))]
pub async fn edit_nonexistent_story(client: &StoryClient) -> Result<(), CheckFailure> {
    let payload = StoryPayload::new("edited story", "Test story description");
    let response = client.edit_story(NONEXISTENT_STORY_ID, &payload).await?;
    expect_message_response(&response, StatusCode::NOT_FOUND, STORY_NOT_FOUND_MESSAGE)
}

#[tracing::instrument(name = "Check: delete nonexistent story", skip(client))]
pub async fn delete_nonexistent_story(client: &StoryClient) -> Result<(), CheckFailure> {
    let response = client.delete_story(NONEXISTENT_STORY_ID).await?;
    expect_message_response(
        &response,
        StatusCode::BAD_REQUEST,
        STORY_NOT_DELETED_MESSAGE,
    )
}
