//! Handler for `POST /api/invites/activate`.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use vouch_core::{referral, store::AuthStore};

use crate::{AppState, auth::CurrentAccount, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ActivateBody {
  #[serde(default)]
  pub invite_code: String,
}

#[derive(Debug, Serialize)]
pub struct ActivateResponse {
  pub activated_invite_code: String,
  pub inviter_phone_number:  String,
}

/// `POST /api/invites/activate` — requires a bearer token.
///
/// One-time and irreversible: the first successful activation wins, every
/// later attempt is rejected with the previously activated code.
pub async fn activate<S>(
  State(state): State<AppState<S>>,
  CurrentAccount(account): CurrentAccount,
  Json(body): Json<ActivateBody>,
) -> Result<Json<ActivateResponse>, ApiError>
where
  S: AuthStore + Clone + Send + Sync + 'static,
{
  let activation = referral::activate_invite(
    state.store.as_ref(),
    account.account_id,
    &body.invite_code,
  )
  .await?;

  tracing::info!(
    account = %account.account_id,
    inviter = %activation.inviter.account_id,
    "invite code activated"
  );
  Ok(Json(ActivateResponse {
    activated_invite_code: activation.activated_invite_code,
    inviter_phone_number:  activation.inviter.phone_number,
  }))
}
