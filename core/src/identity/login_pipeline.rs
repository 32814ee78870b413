// core/src/identity/login_pipeline.rs

use super::contexts::LoginCtxData;
use super::password;
use super::token;
use crate::error::IdentityError;
use crate::models::Principal;
use crate::workflow::{ContextData, Pipeline, StepControl, WorkflowError};
use tracing::{info, instrument, warn};

pub(crate) const PIPELINE_NAME: &str = "identity.login";

pub(crate) fn build() -> Pipeline<LoginCtxData, IdentityError> {
  let mut p = Pipeline::<LoginCtxData, IdentityError>::new(
    PIPELINE_NAME,
    &[
      ("validate_input", false, None),
      ("load_user", false, None),
      ("verify_password", false, None),
      ("issue_token", false, None),
    ],
  );
  p.on_root("validate_input", validate_input);
  p.on_root("load_user", load_user);
  p.on_root("verify_password", verify_password);
  p.on_root("issue_token", issue_token);
  p
}

fn missing_user() -> WorkflowError {
  WorkflowError::Incomplete {
    pipeline: PIPELINE_NAME,
    missing: "user",
  }
}

#[instrument(name = "login::validate_input", skip_all, err(Display))]
async fn validate_input(ctx_data: ContextData<LoginCtxData>) -> Result<StepControl, IdentityError> {
  let guard = ctx_data.read();
  if guard.email.is_empty() || guard.password.is_empty() {
    return Err(IdentityError::MissingCredentials);
  }
  Ok(StepControl::Continue)
}

#[instrument(name = "login::load_user", skip_all, err(Display))]
async fn load_user(ctx_data: ContextData<LoginCtxData>) -> Result<StepControl, IdentityError> {
  let (users, email) = {
    let guard = ctx_data.read();
    (guard.users.clone(), guard.email.clone())
  };
  match users.find_by_email(&email).await? {
    Some(user) => {
      ctx_data.write().user = Some(user);
      Ok(StepControl::Continue)
    }
    None => {
      warn!(%email, "Login for unknown email.");
      Err(IdentityError::InvalidCredentials)
    }
  }
}

#[instrument(name = "login::verify_password", skip_all, err(Display))]
async fn verify_password(ctx_data: ContextData<LoginCtxData>) -> Result<StepControl, IdentityError> {
  let guard = ctx_data.read();
  let user = guard.user.as_ref().ok_or_else(missing_user)?;
  if !password::verify_password(&user.password_hash, &guard.password)? {
    warn!(user_id = %user.id, "Login with wrong password.");
    return Err(IdentityError::InvalidCredentials);
  }
  Ok(StepControl::Continue)
}

#[instrument(name = "login::issue_token", skip_all, err(Display))]
async fn issue_token(ctx_data: ContextData<LoginCtxData>) -> Result<StepControl, IdentityError> {
  let token = {
    let guard = ctx_data.read();
    let user = guard.user.as_ref().ok_or_else(missing_user)?;
    info!(user_id = %user.id, "User logged in.");
    token::issue_token(&guard.tokens, &Principal::from(user))?
  };
  ctx_data.write().token = Some(token);
  Ok(StepControl::Continue)
}
