use axum::response::{IntoResponse, Response};
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),
  #[error("required field `{field}` not found in {url}")]
  MissingField { field: &'static str, url: String },
  #[error("invalid date: {0:?}")]
  InvalidDate(String),
  #[error("invalid selector {selector:?}: {reason}")]
  InvalidSelector { selector: String, reason: String },
  #[error("invalid site profile: {0}")]
  Profile(#[from] serde_json::Error),
  #[error("failed to write feed: {0}")]
  Rss(#[from] rss::Error),
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error("channel not found: {0}")]
  ChannelNotFound(String),
  #[error("invalid configuration: {0}")]
  Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::ChannelNotFound(_) => StatusCode::NOT_FOUND,
      Error::Http(_) => StatusCode::BAD_GATEWAY,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, self.to_string()).into_response()
  }
}
