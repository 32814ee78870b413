// app/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;
use storefront::store::{OrderStore, ProductStore, UserStore};
use storefront::{MockPaymentGateway, PaymentGateway};
use storefront_app::config::{AppConfig, PaymentProvider};
use storefront_app::db::{self, PgOrderStore, PgProductStore, PgUserStore};
use storefront_app::errors::AppError;
use storefront_app::services::{CloudinaryImageStore, DisabledImageStore, ImageStore, StripeGateway};
use storefront_app::state::{AppState, Backends};
use storefront_app::{seed, telemetry, web};
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let app_config = Arc::new(AppConfig::from_env()?);
  telemetry::init_tracing(app_config.log_format)?;
  info!(config = ?app_config, "Starting storefront server...");

  let db_pool = db::connect(&app_config).await?;
  if app_config.run_migrations {
    db::migrate(&db_pool).await?;
  }

  let http_client = reqwest::Client::builder()
    .timeout(app_config.http_timeout)
    .build()
    .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

  let gateway: Arc<dyn PaymentGateway> = match app_config.payment_provider {
    PaymentProvider::Stripe => {
      let secret_key = app_config
        .stripe_secret_key
        .clone()
        .ok_or_else(|| AppError::Config("STRIPE_SECRET_KEY is required".to_string()))?;
      Arc::new(StripeGateway::new(
        http_client.clone(),
        app_config.stripe_api_base.clone(),
        secret_key,
      ))
    }
    PaymentProvider::Mock => {
      warn!("Using the in-process mock payment processor. Payments are not real.");
      Arc::new(MockPaymentGateway::auto_confirming())
    }
  };

  let images: Arc<dyn ImageStore> = match &app_config.cloudinary {
    Some(cloudinary) => Arc::new(CloudinaryImageStore::new(
      http_client.clone(),
      cloudinary.clone(),
      app_config.cloudinary_folder.clone(),
    )),
    None => {
      warn!("Cloudinary credentials missing; image uploads are disabled.");
      Arc::new(DisabledImageStore)
    }
  };

  let backends = Backends {
    products: Arc::new(PgProductStore::new(db_pool.clone())) as Arc<dyn ProductStore>,
    users: Arc::new(PgUserStore::new(db_pool.clone())) as Arc<dyn UserStore>,
    orders: Arc::new(PgOrderStore::new(db_pool.clone())) as Arc<dyn OrderStore>,
    gateway,
    images,
  };

  if app_config.seed_db {
    seed::seed_products(&backends.products).await?;
    let admin_password = app_config
      .seed_admin_password
      .as_deref()
      .ok_or_else(|| AppError::Config("SEED_ADMIN_PASSWORD is required when SEED_DB is set".to_string()))?;
    seed::ensure_admin(&backends.users, &app_config.seed_admin_email, admin_password).await?;
  }

  let app_state = AppState::new(app_config.clone(), backends);
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  info!("Binding server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(web::security_headers())
      .wrap(web::cors(&app_state.config))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await?;

  info!("Server stopped.");
  Ok(())
}
