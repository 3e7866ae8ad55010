use thiserror::Error;

/// Custom error types for the RFP Navigator pipeline.
///
/// Every failure is caught at the boundary of the action that triggered it
/// and converted to a user-visible message; nothing here is retried
/// automatically.
#[derive(Error, Debug)]
pub enum NavigatorError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Failed to parse PDF document: {0}")]
    DocumentParse(String),
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to completion API: {0}")]
    CompletionRequest(reqwest::Error),
    #[error("Failed to deserialize completion API response: {0}")]
    CompletionDeserialization(reqwest::Error),
    #[error("Completion API returned an error: {0}")]
    CompletionApi(String),
    #[error("Log sink rejected the record: {0}")]
    LogSink(String),
    #[error("Session error: {0}")]
    Session(String),
}
