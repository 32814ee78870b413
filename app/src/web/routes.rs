// app/src/web/routes.rs

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;
use actix_web::{error, web, HttpRequest};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::web::handlers::{
  auth_handlers, checkout_handlers, health_handlers, order_handlers, product_handlers, upload_handlers,
};

/// Lets the storefront pages load Stripe.js and talk to the Stripe API.
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
  script-src 'self' https://js.stripe.com; \
  style-src 'self' 'unsafe-inline'; \
  style-src-elem 'self' 'unsafe-inline'; \
  style-src-attr 'self' 'unsafe-inline'; \
  connect-src 'self' https://api.stripe.com; \
  frame-src https://js.stripe.com https://hooks.stripe.com; \
  img-src 'self' data: https:; \
  font-src 'self' data:; \
  object-src 'none'";

fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(format!("Invalid JSON body: {err}")).into()
}

fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(format!("Invalid query string: {err}")).into()
}

/// CORS limited to the configured storefront origins.
pub fn cors(config: &AppConfig) -> Cors {
  config
    .allowed_origins
    .iter()
    .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
    .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
    .supports_credentials()
    .max_age(3600)
}

pub fn security_headers() -> DefaultHeaders {
  DefaultHeaders::new().add((header::CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
    .route("/health", web::get().to(health_handlers::health_check_handler))
    .service(
      web::scope("/auth")
        .route("/register", web::post().to(auth_handlers::register_handler))
        .route("/login", web::post().to(auth_handlers::login_handler)),
    )
    .service(
      web::resource("/products")
        .route(web::get().to(product_handlers::list_products_handler))
        .route(web::post().to(product_handlers::create_product_handler)),
    )
    .service(
      web::resource("/products/{product_id}")
        .route(web::get().to(product_handlers::get_product_handler))
        .route(web::delete().to(product_handlers::delete_product_handler)),
    )
    .route("/upload", web::post().to(upload_handlers::upload_image_handler))
    .route(
      "/create-payment-intent",
      web::post().to(checkout_handlers::create_payment_intent_handler),
    )
    .service(
      web::resource("/orders")
        .route(web::get().to(order_handlers::list_orders_handler))
        .route(web::post().to(checkout_handlers::create_order_handler)),
    )
    .route("/my/orders", web::get().to(order_handlers::my_orders_handler));
}
