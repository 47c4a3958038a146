//! The sign-in flow: code issuance, code verification, and identity
//! resolution.
//!
//! These functions are generic over the storage backend; all atomicity
//! (consume-exactly-once, get-or-create) is delegated to [`AuthStore`].

use crate::{
  account::{Account, NewAccount},
  codes::CodeGenerator,
  error::{Error, Result},
  store::{AuthStore, CreateAccountOutcome},
  token::AccessToken,
  verification::{NewVerification, VerificationRecord},
};

// ─── Issuance ────────────────────────────────────────────────────────────────

/// Issue a fresh verification code for `phone_number` and persist it as an
/// unverified record.
///
/// Issuing twice produces two independent records; codes carry no
/// uniqueness constraint.
pub async fn issue_code<S: AuthStore>(
  store:        &S,
  codes:        &dyn CodeGenerator,
  phone_number: &str,
) -> Result<VerificationRecord> {
  if phone_number.is_empty() {
    return Err(Error::MissingPhoneNumber);
  }

  store
    .record_verification(NewVerification {
      phone_number: phone_number.to_owned(),
      code:         codes.verification_code(),
    })
    .await
    .map_err(Error::store)
}

// ─── Verification ────────────────────────────────────────────────────────────

/// Outcome of a successful verification: the resolved identity.
#[derive(Debug, Clone)]
pub struct SignIn {
  pub account: Account,
  pub token:   AccessToken,
  /// True on first-time registration, false on repeat login.
  pub created: bool,
}

/// Verify a submitted (phone, code) pair and resolve the identity.
///
/// Consumes the most recent matching unverified record (that record can
/// never be consumed again), then gets-or-creates the account and its
/// bearer token.
pub async fn verify_code<S: AuthStore>(
  store:        &S,
  codes:        &dyn CodeGenerator,
  phone_number: &str,
  code:         &str,
) -> Result<SignIn> {
  if phone_number.is_empty() {
    return Err(Error::MissingPhoneNumber);
  }
  if code.is_empty() {
    return Err(Error::MissingVerificationCode);
  }

  store
    .consume_latest(phone_number, code)
    .await
    .map_err(Error::store)?
    .ok_or(Error::InvalidCode)?;

  let (account, created) = resolve_account(store, codes, phone_number).await?;

  let token = store
    .get_or_create_token(account.account_id, codes.bearer_token())
    .await
    .map_err(Error::store)?;

  Ok(SignIn { account, token, created })
}

/// Get-or-create the account for a verified phone number.
///
/// Invite codes are drawn until the store accepts one. With 36^6 possible
/// codes even a single retry is vanishingly rare.
async fn resolve_account<S: AuthStore>(
  store:        &S,
  codes:        &dyn CodeGenerator,
  phone_number: &str,
) -> Result<(Account, bool)> {
  loop {
    let input = NewAccount {
      phone_number: phone_number.to_owned(),
      invite_code:  codes.invite_code(),
    };
    match store.create_account(input).await.map_err(Error::store)? {
      CreateAccountOutcome::Created(account) => return Ok((account, true)),
      CreateAccountOutcome::PhoneExists(account) => return Ok((account, false)),
      CreateAccountOutcome::InviteCodeTaken => continue,
    }
  }
}
