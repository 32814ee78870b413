// core/src/identity/mod.rs

//! Registration, login and bearer-token verification.

pub mod contexts;
pub mod password;
pub mod token;

mod login_pipeline;
mod register_pipeline;

use crate::error::IdentityError;
use crate::models::{Principal, PublicUser};
use crate::store::UserStore;
use crate::workflow::{ContextData, Pipeline, PipelineOutcome, WorkflowError};
use contexts::{LoginCtxData, RegisterCtxData};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

pub use token::{Claims, TokenSettings};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterInput {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub password: Option<String>,
}

/// Returned by register and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSession {
  pub token: String,
  pub user: PublicUser,
}

/// Emails are compared and stored trimmed and lower-cased.
pub fn normalize_email(raw: Option<&str>) -> String {
  raw.map(|e| e.trim().to_lowercase()).unwrap_or_default()
}

pub struct Identity {
  users: Arc<dyn UserStore>,
  tokens: Arc<TokenSettings>,
  register_pipeline: Pipeline<RegisterCtxData, IdentityError>,
  login_pipeline: Pipeline<LoginCtxData, IdentityError>,
}

impl std::fmt::Debug for Identity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Identity")
      .field("tokens", &self.tokens)
      .field("register_pipeline", &self.register_pipeline)
      .field("login_pipeline", &self.login_pipeline)
      .finish()
  }
}

impl Identity {
  pub fn new(users: Arc<dyn UserStore>, tokens: TokenSettings) -> Self {
    Identity {
      users,
      tokens: Arc::new(tokens),
      register_pipeline: register_pipeline::build(),
      login_pipeline: login_pipeline::build(),
    }
  }

  /// Creates a `user`-role account. The role is never taken from input.
  #[instrument(name = "identity::register", skip_all, err(Display))]
  pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, IdentityError> {
    let ctx_data = ContextData::new(RegisterCtxData {
      users: self.users.clone(),
      tokens: self.tokens.clone(),
      name: input.name.map(|n| n.trim().to_string()).unwrap_or_default(),
      email: normalize_email(input.email.as_deref()),
      password: input.password.unwrap_or_default(),
      user: None,
      token: None,
    });

    if self.register_pipeline.run(ctx_data.clone()).await? == PipelineOutcome::Stopped {
      return Err(incomplete(register_pipeline::PIPELINE_NAME));
    }
    let mut guard = ctx_data.write();
    session(guard.user.take().as_ref().map(PublicUser::from), guard.token.take(), register_pipeline::PIPELINE_NAME)
  }

  #[instrument(name = "identity::login", skip_all, err(Display))]
  pub async fn login(&self, input: LoginInput) -> Result<AuthSession, IdentityError> {
    let ctx_data = ContextData::new(LoginCtxData {
      users: self.users.clone(),
      tokens: self.tokens.clone(),
      email: normalize_email(input.email.as_deref()),
      password: input.password.unwrap_or_default(),
      user: None,
      token: None,
    });

    if self.login_pipeline.run(ctx_data.clone()).await? == PipelineOutcome::Stopped {
      return Err(incomplete(login_pipeline::PIPELINE_NAME));
    }
    let mut guard = ctx_data.write();
    session(guard.user.take().as_ref().map(PublicUser::from), guard.token.take(), login_pipeline::PIPELINE_NAME)
  }

  /// Resolves a bearer token to the principal it was issued for.
  pub fn verify(&self, token: &str) -> Result<Principal, IdentityError> {
    token::verify_token(&self.tokens, token)
  }

  pub fn issue(&self, principal: &Principal) -> Result<String, IdentityError> {
    token::issue_token(&self.tokens, principal)
  }
}

fn session(user: Option<PublicUser>, token: Option<String>, pipeline: &'static str) -> Result<AuthSession, IdentityError> {
  match (user, token) {
    (Some(user), Some(token)) => Ok(AuthSession { token, user }),
    _ => Err(incomplete(pipeline)),
  }
}

fn incomplete(pipeline: &'static str) -> IdentityError {
  IdentityError::Workflow(WorkflowError::Incomplete {
    pipeline,
    missing: "session",
  })
}
