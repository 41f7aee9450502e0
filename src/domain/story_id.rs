/// Identifier handed out by the story service on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryId(String);

impl StoryId {
    /// Returns an instance of `StoryId` if the input holds at least one
    /// non-whitespace character. Surrounding whitespace is dropped.
    pub fn parse(s: String) -> Result<StoryId, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(format!("{:?} is not a valid story id.", s));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for StoryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
