//! The `AuthStore` trait and typed write outcomes.
//!
//! The trait is implemented by storage backends (e.g.
//! `vouch-store-sqlite`). Higher layers depend on this abstraction, not on
//! any concrete backend, and never see a backend's constraint-violation
//! shape: the check-then-write operations (`create_account`,
//! `consume_latest`, `set_activated_code`) report conflicts as typed
//! results and must each be atomic with respect to other callers.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  account::{Account, NewAccount},
  token::AccessToken,
  verification::{NewVerification, VerificationRecord},
};

// ─── Write outcomes ──────────────────────────────────────────────────────────

/// Result of the insert-if-absent account creation.
#[derive(Debug, Clone)]
pub enum CreateAccountOutcome {
  /// No account held this phone number; one was created.
  Created(Account),
  /// The phone number already had an account; nothing was written.
  PhoneExists(Account),
  /// The candidate invite code is already assigned to some account.
  /// The caller should draw a new code and retry.
  InviteCodeTaken,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Vouch storage backend.
pub trait AuthStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Verification codes ────────────────────────────────────────────────

  /// Append an unverified record. `verification_id` and `created_at` are
  /// set by the store.
  fn record_verification(
    &self,
    input: NewVerification,
  ) -> impl Future<Output = Result<VerificationRecord, Self::Error>> + Send;

  /// Consume the most recent unverified record matching (phone, code):
  /// flip `is_verified` and return the record. `None` when no such record
  /// exists — including when every match was already consumed.
  fn consume_latest(
    &self,
    phone_number: &str,
    code: &str,
  ) -> impl Future<Output = Result<Option<VerificationRecord>, Self::Error>> + Send;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Insert-if-absent by phone number; see [`CreateAccountOutcome`].
  fn create_account(
    &self,
    input: NewAccount,
  ) -> impl Future<Output = Result<CreateAccountOutcome, Self::Error>> + Send;

  /// Retrieve an account by id. Returns `None` if not found.
  fn get_account(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send;

  /// Retrieve the account holding `invite_code`, if any.
  fn account_by_invite_code(
    &self,
    invite_code: &str,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send;

  /// Set `activated_invite_code` if and only if it is currently unset.
  /// Returns `false` when another writer got there first.
  fn set_activated_code(
    &self,
    account_id: Uuid,
    invite_code: &str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

  /// All accounts whose `activated_invite_code` equals `invite_code`,
  /// oldest first.
  fn referrals(
    &self,
    invite_code: &str,
  ) -> impl Future<Output = Result<Vec<Account>, Self::Error>> + Send;

  // ── Tokens ────────────────────────────────────────────────────────────

  /// Return the account's bearer token, inserting `candidate` if the
  /// account has none yet. An existing token is never replaced.
  fn get_or_create_token(
    &self,
    account_id: Uuid,
    candidate: String,
  ) -> impl Future<Output = Result<AccessToken, Self::Error>> + Send;

  /// Resolve a presented bearer token to its account.
  fn account_by_token(
    &self,
    token: &str,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send;
}
