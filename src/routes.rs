//! Endpoint paths of the story service, relative to its base URL.

/// Exchanges a username and password for an access token
pub const AUTHENTICATION_PATH: &str = "/api/User/Authentication";

pub const CREATE_STORY_PATH: &str = "/api/Story/Create";

pub const ALL_STORIES_PATH: &str = "/api/Story/All";

/// Path of the edit endpoint for a single story
pub fn edit_story_path(story_id: &str) -> String {
    format!("/api/Story/Edit/{}", story_id)
}

/// Path of the delete endpoint for a single story
pub fn delete_story_path(story_id: &str) -> String {
    format!("/api/Story/Delete/{}", story_id)
}
