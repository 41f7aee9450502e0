mod access_token;

pub use access_token::{AccessToken, AuthError, Credentials, fetch_access_token};
