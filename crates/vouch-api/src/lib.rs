//! JSON REST API for Vouch.
//!
//! Exposes an axum [`Router`] backed by any
//! [`vouch_core::store::AuthStore`]. TLS and deployment concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = vouch_api::router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod error;
pub mod invites;
pub mod profile;
pub mod signin;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use vouch_core::{codes::CodeGenerator, store::AuthStore};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  pub store_path:   PathBuf,
  /// Simulated SMS delivery latency per issuance request, in
  /// milliseconds. Local per-call latency, never a global throttle.
  #[serde(default = "default_sms_delay_ms")]
  pub sms_delay_ms: u64,
}

fn default_sms_delay_ms() -> u64 { 1500 }

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: AuthStore> {
  pub store:  Arc<S>,
  pub codes:  Arc<dyn CodeGenerator>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: AuthStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/api/auth/code",        post(signin::issue::<S>))
    .route("/api/auth/verify",      post(signin::verify::<S>))
    .route("/api/profile",          get(profile::get_one::<S>))
    .route("/api/invites/activate", post(invites::activate::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use vouch_core::codes::RandomCodes;
  use vouch_store_sqlite::SqliteStore;

  use super::*;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      store:  Arc::new(store),
      codes:  Arc::new(RandomCodes),
      config: Arc::new(ServerConfig {
        host:         "127.0.0.1".to_string(),
        port:         8080,
        store_path:   PathBuf::from(":memory:"),
        sms_delay_ms: 0,
      }),
    }
  }

  async fn request(
    state:  AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    token:  Option<&str>,
    body:   Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    router(state).oneshot(req).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  /// Full issue+verify cycle for `phone`; returns the verify response.
  async fn sign_in(state: &AppState<SqliteStore>, phone: &str) -> Value {
    let resp = request(
      state.clone(),
      "POST",
      "/api/auth/code",
      None,
      Some(json!({ "phone_number": phone })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let issued = json_body(resp).await;
    let code = issued["code"].as_str().unwrap().to_owned();

    let resp = request(
      state.clone(),
      "POST",
      "/api/auth/verify",
      None,
      Some(json!({ "phone_number": phone, "code": code })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    json_body(resp).await
  }

  // ── Issuance ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn issue_returns_a_four_digit_code() {
    let state = make_state().await;
    let resp = request(
      state,
      "POST",
      "/api/auth/code",
      None,
      Some(json!({ "phone_number": "+375291112233" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["phone_number"], "+375291112233");
    let code = body["code"].as_str().unwrap();
    assert_eq!(code.len(), 4);
    assert!(code.bytes().all(|b| b.is_ascii_digit()), "code: {code}");
  }

  #[tokio::test]
  async fn issue_with_empty_phone_returns_400() {
    let state = make_state().await;
    let resp = request(
      state,
      "POST",
      "/api/auth/code",
      None,
      Some(json!({ "phone_number": "" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("phone number"));
  }

  // ── Verification ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn verify_registers_then_recognises_the_account() {
    let state = make_state().await;
    let phone = "+375291112233";

    let first = sign_in(&state, phone).await;
    assert_eq!(first["is_new_account"], true);
    assert_eq!(first["phone_number"], phone);
    assert_eq!(first["invite_code"].as_str().unwrap().len(), 6);
    assert_eq!(first["token"].as_str().unwrap().len(), 40);

    let second = sign_in(&state, phone).await;
    assert_eq!(second["is_new_account"], false);
    assert_eq!(second["account_id"], first["account_id"]);
    assert_eq!(second["token"], first["token"]);
  }

  #[tokio::test]
  async fn verify_with_wrong_code_returns_400() {
    let state = make_state().await;
    request(
      state.clone(),
      "POST",
      "/api/auth/code",
      None,
      Some(json!({ "phone_number": "+375291112233" })),
    )
    .await;

    // A code is four digits; "leet" was never issued.
    let resp = request(
      state,
      "POST",
      "/api/auth/verify",
      None,
      Some(json!({ "phone_number": "+375291112233", "code": "leet" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn verify_with_missing_fields_returns_400() {
    let state = make_state().await;
    let resp = request(
      state.clone(),
      "POST",
      "/api/auth/verify",
      None,
      Some(json!({ "phone_number": "+375291112233" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = request(
      state,
      "POST",
      "/api/auth/verify",
      None,
      Some(json!({ "code": "1234" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Profile ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn profile_without_token_returns_401() {
    let state = make_state().await;
    let resp = request(state, "GET", "/api/profile", None, None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn fresh_profile_has_no_referrals() {
    let state = make_state().await;
    let session = sign_in(&state, "+375291112233").await;
    let token = session["token"].as_str().unwrap();

    let resp =
      request(state.clone(), "GET", "/api/profile", Some(token), None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["account_id"], session["account_id"]);
    assert_eq!(body["invite_code"], session["invite_code"]);
    assert_eq!(body["activated_invite_code"], Value::Null);
    assert_eq!(body["referrals_count"], 0);
    assert_eq!(body["referrals"], json!([]));
  }

  // ── Referral activation ───────────────────────────────────────────────

  #[tokio::test]
  async fn activation_links_the_referral_end_to_end() {
    let state = make_state().await;
    let inviter = sign_in(&state, "+375291112233").await;
    let invitee = sign_in(&state, "+375294567892").await;
    let inviter_code = inviter["invite_code"].as_str().unwrap();
    let invitee_token = invitee["token"].as_str().unwrap();

    let resp = request(
      state.clone(),
      "POST",
      "/api/invites/activate",
      Some(invitee_token),
      Some(json!({ "invite_code": inviter_code })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["activated_invite_code"], *inviter_code);
    assert_eq!(body["inviter_phone_number"], "+375291112233");

    // The inviter's profile now lists the invitee.
    let inviter_token = inviter["token"].as_str().unwrap();
    let resp = request(
      state.clone(),
      "GET",
      "/api/profile",
      Some(inviter_token),
      None,
    )
    .await;
    let profile = json_body(resp).await;
    assert_eq!(profile["referrals_count"], 1);
    assert_eq!(profile["referrals"][0]["phone_number"], "+375294567892");
  }

  #[tokio::test]
  async fn second_activation_returns_400_with_the_prior_code() {
    let state = make_state().await;
    let inviter = sign_in(&state, "+375291112233").await;
    let other   = sign_in(&state, "+375290000001").await;
    let invitee = sign_in(&state, "+375294567892").await;
    let token = invitee["token"].as_str().unwrap();

    let resp = request(
      state.clone(),
      "POST",
      "/api/invites/activate",
      Some(token),
      Some(json!({ "invite_code": inviter["invite_code"] })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = request(
      state,
      "POST",
      "/api/invites/activate",
      Some(token),
      Some(json!({ "invite_code": other["invite_code"] })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(
      body["error"]
        .as_str()
        .unwrap()
        .contains(inviter["invite_code"].as_str().unwrap()),
      "error should carry the previously activated code: {body}"
    );
  }

  #[tokio::test]
  async fn activating_your_own_code_returns_400() {
    let state = make_state().await;
    let session = sign_in(&state, "+375291112233").await;
    let token = session["token"].as_str().unwrap();

    let resp = request(
      state,
      "POST",
      "/api/invites/activate",
      Some(token),
      Some(json!({ "invite_code": session["invite_code"] })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("own invite code"));
  }

  #[tokio::test]
  async fn activating_an_unassigned_code_returns_400() {
    let state = make_state().await;
    let session = sign_in(&state, "+375291112233").await;
    let token = session["token"].as_str().unwrap();

    let resp = request(
      state,
      "POST",
      "/api/invites/activate",
      Some(token),
      Some(json!({ "invite_code": "ZZZ999" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("does not exist"));
  }

  #[tokio::test]
  async fn activation_without_token_returns_401() {
    let state = make_state().await;
    let resp = request(
      state,
      "POST",
      "/api/invites/activate",
      None,
      Some(json!({ "invite_code": "AAAAAA" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn activation_with_empty_code_returns_400() {
    let state = make_state().await;
    let session = sign_in(&state, "+375291112233").await;
    let token = session["token"].as_str().unwrap();

    let resp = request(
      state,
      "POST",
      "/api/invites/activate",
      Some(token),
      Some(json!({})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("invite code"));
  }
}
