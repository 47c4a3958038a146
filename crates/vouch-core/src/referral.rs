//! Referral activation and the profile read model.

use uuid::Uuid;

use crate::{
  account::{Account, ProfileView},
  error::{Error, Result},
  store::AuthStore,
};

/// Outcome of a successful activation.
#[derive(Debug, Clone)]
pub struct Activation {
  pub activated_invite_code: String,
  /// The account whose code was redeemed.
  pub inviter:               Account,
}

/// Redeem `invite_code` on behalf of `account_id`, linking it as a
/// referral of the code's owner.
///
/// The check order is fixed — each failure names its own precondition:
/// empty input, already activated (surfacing the prior code), own code,
/// unknown code.
pub async fn activate_invite<S: AuthStore>(
  store:       &S,
  account_id:  Uuid,
  invite_code: &str,
) -> Result<Activation> {
  if invite_code.is_empty() {
    return Err(Error::MissingInviteCode);
  }

  let account = store
    .get_account(account_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::AccountNotFound(account_id))?;

  if let Some(prev) = account.activated_invite_code {
    return Err(Error::AlreadyActivated(prev));
  }
  if invite_code == account.invite_code {
    return Err(Error::SelfActivation);
  }

  let inviter = store
    .account_by_invite_code(invite_code)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::InviteNotFound(invite_code.to_owned()))?;

  // Set-if-null. A concurrent activation that lands first turns this into
  // an AlreadyActivated report carrying whichever code won.
  let updated = store
    .set_activated_code(account_id, invite_code)
    .await
    .map_err(Error::store)?;
  if !updated {
    let current = store
      .get_account(account_id)
      .await
      .map_err(Error::store)?
      .and_then(|a| a.activated_invite_code)
      .unwrap_or_default();
    return Err(Error::AlreadyActivated(current));
  }

  Ok(Activation {
    activated_invite_code: invite_code.to_owned(),
    inviter,
  })
}

/// Materialise the profile read model: the account plus its live referral
/// list. Computed from the current store state on every call, never
/// cached.
pub async fn profile<S: AuthStore>(
  store:      &S,
  account_id: Uuid,
) -> Result<ProfileView> {
  let account = store
    .get_account(account_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::AccountNotFound(account_id))?;

  let referrals = store
    .referrals(&account.invite_code)
    .await
    .map_err(Error::store)?;

  Ok(ProfileView { account, referrals })
}
