// app/src/services/stripe.rs

//! Stripe PaymentIntents over the REST API.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use storefront::{PaymentError, PaymentGateway, PaymentIntent, PaymentIntentRequest};
use tracing::{info, instrument, warn};

#[derive(Debug, Deserialize)]
struct StripeIntent {
  id: String,
  amount: i64,
  currency: String,
  status: String,
  #[serde(default)]
  client_secret: Option<String>,
}

impl From<StripeIntent> for PaymentIntent {
  fn from(raw: StripeIntent) -> Self {
    PaymentIntent {
      id: raw.id,
      amount_cents: raw.amount,
      currency: raw.currency,
      status: raw.status,
      client_secret: raw.client_secret,
    }
  }
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
  error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
  #[serde(default)]
  message: Option<String>,
  #[serde(default, rename = "type")]
  kind: Option<String>,
}

/// Stripe intent ids look like `pi_3Nk...`. Anything else never reaches the URL path.
fn is_intent_id(reference: &str) -> bool {
  reference
    .strip_prefix("pi_")
    .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_'))
}

#[derive(Clone)]
pub struct StripeGateway {
  client: Client,
  api_base: String,
  secret_key: String,
}

impl std::fmt::Debug for StripeGateway {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StripeGateway").field("api_base", &self.api_base).finish_non_exhaustive()
  }
}

impl StripeGateway {
  pub fn new(client: Client, api_base: impl Into<String>, secret_key: impl Into<String>) -> Self {
    StripeGateway {
      client,
      api_base: api_base.into(),
      secret_key: secret_key.into(),
    }
  }

  /// 4xx answers are the processor refusing the request; anything else is
  /// the processor being unreachable or broken.
  async fn read_intent(response: Response) -> Result<PaymentIntent, PaymentError> {
    let status = response.status();
    if status.is_success() {
      let raw: StripeIntent = response.json().await.map_err(PaymentError::unavailable)?;
      return Ok(raw.into());
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<StripeErrorBody>(&body).ok().map(|b| b.error);
    let message = detail
      .as_ref()
      .and_then(|d| d.message.clone())
      .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    warn!(
      status = status.as_u16(),
      error_type = %detail.and_then(|d| d.kind).unwrap_or_default(),
      %message,
      "Stripe request failed."
    );
    if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
      Err(PaymentError::Rejected(message))
    } else {
      Err(PaymentError::unavailable(anyhow::anyhow!("stripe answered {}: {}", status, message)))
    }
  }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
  #[instrument(name = "stripe::create_intent", skip(self), err(Display))]
  async fn create_intent(&self, request: PaymentIntentRequest) -> Result<PaymentIntent, PaymentError> {
    let form = [
      ("amount", request.amount_cents.to_string()),
      ("currency", request.currency.clone()),
      ("automatic_payment_methods[enabled]", "true".to_string()),
      ("metadata[userId]", request.customer_ref.clone()),
    ];
    let response = self
      .client
      .post(format!("{}/v1/payment_intents", self.api_base))
      .bearer_auth(&self.secret_key)
      .form(&form)
      .send()
      .await
      .map_err(PaymentError::unavailable)?;
    let intent = Self::read_intent(response).await?;
    info!(payment_intent_id = %intent.id, amount_cents = intent.amount_cents, "Stripe payment intent created.");
    Ok(intent)
  }

  #[instrument(name = "stripe::retrieve_intent", skip(self), err(Display))]
  async fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, PaymentError> {
    if !is_intent_id(intent_id) {
      warn!(%intent_id, "Refusing to look up a malformed payment intent id.");
      return Err(PaymentError::Rejected(format!("No such payment_intent: '{intent_id}'")));
    }
    let response = self
      .client
      .get(format!("{}/v1/payment_intents/{}", self.api_base, intent_id))
      .bearer_auth(&self.secret_key)
      .send()
      .await
      .map_err(PaymentError::unavailable)?;
    Self::read_intent(response).await
  }
}
