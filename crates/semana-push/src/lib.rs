//! Web Push delivery transport for semana.
//!
//! Wraps the [`web_push`] crate: builds a VAPID signature per
//! subscription, encrypts the JSON payload with aes128gcm, and attempts
//! exactly one delivery per call. 404/410-class responses map to
//! [`PushError::Gone`] so the fan-out can prune the subscription;
//! everything else is a swallowable [`PushError::Delivery`].

use semana_core::{
  push::{PushError, PushPayload, PushTransport},
  subscription::Subscription,
};
use web_push::{
  ContentEncoding, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
  WebPushError, WebPushMessageBuilder,
};

/// VAPID identity used to sign every delivery. Deliberately not
/// `Debug`: the private key must not end up in logs.
#[derive(Clone)]
pub struct VapidConfig {
  /// `mailto:` address or URL identifying the sender.
  pub subject:     String,
  /// URL-safe base64 (unpadded) P-256 private key.
  pub private_key: String,
}

/// A [`PushTransport`] backed by the Web Push protocol.
///
/// The signature is rebuilt per delivery because the VAPID audience
/// claim depends on the subscription's endpoint origin.
pub struct WebPushTransport {
  client: WebPushClient,
  vapid:  VapidConfig,
}

impl WebPushTransport {
  pub fn new(vapid: VapidConfig) -> Result<Self, PushError> {
    let client = WebPushClient::new().map_err(classify)?;
    Ok(Self { client, vapid })
  }
}

impl PushTransport for WebPushTransport {
  async fn send(
    &self,
    sub: &Subscription,
    payload: &PushPayload,
  ) -> Result<(), PushError> {
    let info = SubscriptionInfo::new(
      sub.endpoint.clone(),
      sub.p256dh.clone(),
      sub.auth.clone(),
    );

    let mut signature = VapidSignatureBuilder::from_base64(
      &self.vapid.private_key,
      web_push::URL_SAFE_NO_PAD,
      &info,
    )
    .map_err(classify)?;
    signature.add_claim("sub", self.vapid.subject.as_str());

    let body = serde_json::to_vec(payload)
      .map_err(|e| PushError::Delivery(e.to_string()))?;

    let mut message = WebPushMessageBuilder::new(&info).map_err(classify)?;
    message.set_payload(ContentEncoding::Aes128Gcm, &body);
    message.set_vapid_signature(signature.build().map_err(classify)?);

    self
      .client
      .send(message.build().map_err(classify)?)
      .await
      .map_err(classify)
  }
}

/// Classify transport failures: only endpoint-gone responses are
/// permanent. The underlying crate reports HTTP 404 as `EndpointNotValid`
/// and 410 as `EndpointNotFound`.
fn classify(e: WebPushError) -> PushError {
  match e {
    WebPushError::EndpointNotValid | WebPushError::EndpointNotFound => {
      PushError::Gone
    }
    other => PushError::Delivery(other.to_string()),
  }
}
