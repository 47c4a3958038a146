//! Handlers for the `/api/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/auth/code`   | Body: `{"phone_number":"+375291112233"}` |
//! | `POST` | `/api/auth/verify` | Body: `{"phone_number":"…","code":"1234"}` |

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vouch_core::{signin, store::AuthStore};

use crate::{AppState, error::ApiError};

// ─── Issue ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct IssueBody {
  #[serde(default)]
  pub phone_number: String,
}

#[derive(Debug, Serialize)]
pub struct IssueResponse {
  pub phone_number: String,
  /// The plaintext code stands in for SMS delivery — a deliberate
  /// test/demo affordance, not a production posture.
  pub code:         String,
}

/// `POST /api/auth/code`
pub async fn issue<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<IssueBody>,
) -> Result<Json<IssueResponse>, ApiError>
where
  S: AuthStore + Clone + Send + Sync + 'static,
{
  let record = signin::issue_code(
    state.store.as_ref(),
    state.codes.as_ref(),
    &body.phone_number,
  )
  .await?;

  // Simulated SMS delivery latency; local to this request only.
  tokio::time::sleep(Duration::from_millis(state.config.sms_delay_ms)).await;

  tracing::info!(phone = %record.phone_number, "verification code issued");
  Ok(Json(IssueResponse {
    phone_number: record.phone_number,
    code:         record.code,
  }))
}

// ─── Verify ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VerifyBody {
  #[serde(default)]
  pub phone_number: String,
  #[serde(default)]
  pub code:         String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
  pub token:          String,
  pub account_id:     Uuid,
  pub phone_number:   String,
  pub invite_code:    String,
  pub is_new_account: bool,
}

/// `POST /api/auth/verify`
pub async fn verify<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<VerifyBody>,
) -> Result<Json<VerifyResponse>, ApiError>
where
  S: AuthStore + Clone + Send + Sync + 'static,
{
  let outcome = signin::verify_code(
    state.store.as_ref(),
    state.codes.as_ref(),
    &body.phone_number,
    &body.code,
  )
  .await?;

  tracing::info!(
    account = %outcome.account.account_id,
    new = outcome.created,
    "phone number verified"
  );
  Ok(Json(VerifyResponse {
    token:          outcome.token.token,
    account_id:     outcome.account.account_id,
    phone_number:   outcome.account.phone_number,
    invite_code:    outcome.account.invite_code,
    is_new_account: outcome.created,
  }))
}
