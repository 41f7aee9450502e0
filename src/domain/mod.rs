mod responses;
mod story;
mod story_id;

pub use responses::{CreateStoryResponse, MessageResponse};
pub use story::StoryPayload;
pub use story_id::StoryId;
