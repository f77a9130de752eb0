//! Error types for `semana-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown weekday name: {0:?}")]
  UnknownWeekday(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
