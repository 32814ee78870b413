// app/src/state.rs
use crate::config::AppConfig;
use crate::services::ImageStore;
use std::sync::Arc;
use storefront::store::{OrderStore, ProductStore, UserStore};
use storefront::{Catalog, CheckoutOrchestrator, CheckoutSettings, Identity, PaymentGateway, TokenSettings};

/// Storage and integration handles the services are built from.
#[derive(Clone)]
pub struct Backends {
  pub products: Arc<dyn ProductStore>,
  pub users: Arc<dyn UserStore>,
  pub orders: Arc<dyn OrderStore>,
  pub gateway: Arc<dyn PaymentGateway>,
  pub images: Arc<dyn ImageStore>,
}

#[derive(Clone)]
pub struct AppState {
  pub catalog: Catalog,
  pub identity: Arc<Identity>,
  pub checkout: Arc<CheckoutOrchestrator>,
  pub orders: Arc<dyn OrderStore>,
  pub images: Arc<dyn ImageStore>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  pub fn new(config: Arc<AppConfig>, backends: Backends) -> Self {
    let checkout_settings = CheckoutSettings {
      currency: config.currency.clone(),
      verify_payments: config.verify_payments,
      ..CheckoutSettings::default()
    };
    AppState {
      catalog: Catalog::new(backends.products),
      identity: Arc::new(Identity::new(
        backends.users,
        TokenSettings::new(config.jwt_secret.clone(), config.jwt_ttl),
      )),
      checkout: Arc::new(CheckoutOrchestrator::new(
        backends.orders.clone(),
        backends.gateway,
        checkout_settings,
      )),
      orders: backends.orders,
      images: backends.images,
      config,
    }
  }
}
