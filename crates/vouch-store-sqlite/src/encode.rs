//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Booleans are stored as 0/1 integers.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vouch_core::{
  account::Account, token::AccessToken, verification::VerificationRecord,
};

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `accounts` row.
pub struct RawAccount {
  pub account_id:            String,
  pub phone_number:          String,
  pub invite_code:           String,
  pub activated_invite_code: Option<String>,
  pub created_at:            String,
}

impl RawAccount {
  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      account_id:            decode_uuid(&self.account_id)?,
      phone_number:          self.phone_number,
      invite_code:           self.invite_code,
      activated_invite_code: self.activated_invite_code,
      created_at:            decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `verifications` row.
pub struct RawVerification {
  pub verification_id: String,
  pub phone_number:    String,
  pub code:            String,
  pub created_at:      String,
  pub is_verified:     bool,
}

impl RawVerification {
  pub fn into_record(self) -> Result<VerificationRecord> {
    Ok(VerificationRecord {
      verification_id: decode_uuid(&self.verification_id)?,
      phone_number:    self.phone_number,
      code:            self.code,
      created_at:      decode_dt(&self.created_at)?,
      is_verified:     self.is_verified,
    })
  }
}

/// Raw strings read directly from an `access_tokens` row.
pub struct RawToken {
  pub token:      String,
  pub account_id: String,
  pub created_at: String,
}

impl RawToken {
  pub fn into_token(self) -> Result<AccessToken> {
    Ok(AccessToken {
      token:      self.token,
      account_id: decode_uuid(&self.account_id)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
