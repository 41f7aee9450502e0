//! Response envelopes returned by the story service.
//!
//! Every field is optional: presence is something the checks assert on,
//! not something deserialization should reject.

#[derive(serde::Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoryResponse {
    pub story_id: Option<String>,
    pub msg: Option<String>,
}

#[derive(serde::Deserialize, Debug, Clone, Default)]
pub struct MessageResponse {
    pub msg: Option<String>,
}
