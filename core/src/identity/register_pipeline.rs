// core/src/identity/register_pipeline.rs

use super::contexts::RegisterCtxData;
use super::password;
use super::token;
use crate::error::{IdentityError, StoreError};
use crate::models::{Principal, Role, User};
use crate::workflow::{ContextData, Pipeline, StepControl, WorkflowError};
use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub(crate) const PIPELINE_NAME: &str = "identity.register";

pub(crate) fn build() -> Pipeline<RegisterCtxData, IdentityError> {
  let mut p = Pipeline::<RegisterCtxData, IdentityError>::new(
    PIPELINE_NAME,
    &[
      ("validate_input", false, None),
      ("check_email_available", false, None),
      ("create_user", false, None),
      ("issue_token", false, None),
    ],
  );
  p.on_root("validate_input", validate_input);
  p.on_root("check_email_available", check_email_available);
  p.on_root("create_user", create_user);
  p.on_root("issue_token", issue_token);
  p
}

#[instrument(name = "register::validate_input", skip_all, err(Display))]
async fn validate_input(ctx_data: ContextData<RegisterCtxData>) -> Result<StepControl, IdentityError> {
  let guard = ctx_data.read();
  if guard.email.is_empty() || guard.password.is_empty() {
    return Err(IdentityError::MissingCredentials);
  }
  Ok(StepControl::Continue)
}

#[instrument(name = "register::check_email_available", skip_all, err(Display))]
async fn check_email_available(ctx_data: ContextData<RegisterCtxData>) -> Result<StepControl, IdentityError> {
  let (users, email) = {
    let guard = ctx_data.read();
    (guard.users.clone(), guard.email.clone())
  };
  if users.find_by_email(&email).await?.is_some() {
    warn!(%email, "Registration attempted with an email already in use.");
    return Err(IdentityError::EmailTaken);
  }
  Ok(StepControl::Continue)
}

#[instrument(name = "register::create_user", skip_all, err(Display))]
async fn create_user(ctx_data: ContextData<RegisterCtxData>) -> Result<StepControl, IdentityError> {
  let (users, name, email, password) = {
    let guard = ctx_data.read();
    (guard.users.clone(), guard.name.clone(), guard.email.clone(), guard.password.clone())
  };

  let now = Utc::now();
  let user = User {
    id: Uuid::new_v4(),
    name,
    email,
    password_hash: password::hash_password(&password)?,
    role: Role::User,
    created_at: now,
    updated_at: now,
  };
  // A concurrent registration can still win the race past the lookup above.
  let saved = users.insert(user).await.map_err(|e| match e {
    StoreError::Conflict(_) => IdentityError::EmailTaken,
    other => IdentityError::Store(other),
  })?;
  info!(user_id = %saved.id, email = %saved.email, "User registered.");
  ctx_data.write().user = Some(saved);
  Ok(StepControl::Continue)
}

#[instrument(name = "register::issue_token", skip_all, err(Display))]
async fn issue_token(ctx_data: ContextData<RegisterCtxData>) -> Result<StepControl, IdentityError> {
  let token = {
    let guard = ctx_data.read();
    let user = guard.user.as_ref().ok_or(WorkflowError::Incomplete {
      pipeline: PIPELINE_NAME,
      missing: "user",
    })?;
    token::issue_token(&guard.tokens, &Principal::from(user))?
  };
  ctx_data.write().token = Some(token);
  Ok(StepControl::Continue)
}
