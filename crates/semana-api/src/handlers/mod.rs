//! JSON request handlers, one module per resource.

pub mod changes;
pub mod planning;
pub mod subscribe;

use serde::Serialize;

/// The `{"ok":true}` acknowledgement body shared by the write handlers.
#[derive(Debug, Serialize)]
pub struct OkResponse {
  pub ok: bool,
}

impl OkResponse {
  pub fn new() -> OkResponse {
    OkResponse { ok: true }
  }
}
