mod client;
mod credential;
mod error;

pub use client::GeminiClient;
pub use credential::CredentialStore;
pub use error::AiError;
