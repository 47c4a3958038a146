//! Account — the identity record keyed by phone number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered identity. Created on the first successful verification of
/// a phone number; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
  pub account_id:            Uuid,
  /// Login identity; unique across all accounts.
  pub phone_number:          String,
  /// Six characters from A–Z0–9; globally unique, assigned once at
  /// creation, immutable thereafter.
  pub invite_code:           String,
  /// The invite code of another account this one redeemed. Set at most
  /// once, never this account's own code.
  pub activated_invite_code: Option<String>,
  pub created_at:            DateTime<Utc>,
}

/// Input to [`crate::store::AuthStore::create_account`].
/// `account_id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub phone_number: String,
  pub invite_code:  String,
}

/// The computed read model for an account — never stored, always derived
/// from the current store state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
  pub account:   Account,
  /// All accounts whose `activated_invite_code` equals this account's
  /// `invite_code`, oldest first.
  pub referrals: Vec<Account>,
}
