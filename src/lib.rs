pub mod authentication;
pub mod checks;
pub mod configuration;
pub mod domain;
pub mod routes;
pub mod story_client;
pub mod suite;
pub mod telemetry;
