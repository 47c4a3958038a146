//! Handler for `GET /api/profile`.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use vouch_core::{referral, store::AuthStore};

use crate::{AppState, auth::CurrentAccount, error::ApiError};

#[derive(Debug, Serialize)]
pub struct ReferralEntry {
  pub phone_number: String,
  pub joined_at:    DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
  pub account_id:            Uuid,
  pub phone_number:          String,
  pub invite_code:           String,
  pub activated_invite_code: Option<String>,
  pub referrals:             Vec<ReferralEntry>,
  pub referrals_count:       usize,
}

/// `GET /api/profile` — requires a bearer token.
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  CurrentAccount(account): CurrentAccount,
) -> Result<Json<ProfileResponse>, ApiError>
where
  S: AuthStore + Clone + Send + Sync + 'static,
{
  let view =
    referral::profile(state.store.as_ref(), account.account_id).await?;

  let referrals: Vec<ReferralEntry> = view
    .referrals
    .into_iter()
    .map(|r| ReferralEntry {
      phone_number: r.phone_number,
      joined_at:    r.created_at,
    })
    .collect();

  Ok(Json(ProfileResponse {
    account_id:            view.account.account_id,
    phone_number:          view.account.phone_number,
    invite_code:           view.account.invite_code,
    activated_invite_code: view.account.activated_invite_code,
    referrals_count:       referrals.len(),
    referrals,
  }))
}
