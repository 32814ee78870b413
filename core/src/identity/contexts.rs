// core/src/identity/contexts.rs

use super::token::TokenSettings;
use crate::models::User;
use crate::store::UserStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct RegisterCtxData {
  pub users: Arc<dyn UserStore>,
  pub tokens: Arc<TokenSettings>,
  pub name: String,
  pub email: String,
  pub password: String,
  pub user: Option<User>,
  pub token: Option<String>,
}

#[derive(Clone)]
pub struct LoginCtxData {
  pub users: Arc<dyn UserStore>,
  pub tokens: Arc<TokenSettings>,
  pub email: String,
  pub password: String,
  pub user: Option<User>,
  pub token: Option<String>,
}
