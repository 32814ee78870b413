// tests/api_tests.rs

use actix_web::http::{header, Method, StatusCode};
use actix_web::{test, web, App};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use storefront::store::memory::{MemoryOrderStore, MemoryProductStore, MemoryUserStore};
use storefront::store::{OrderStore, ProductStore, UserStore};
use storefront::{LoginInput, MockPaymentGateway, PaymentGateway, RegisterInput};
use storefront_app::config::AppConfig;
use storefront_app::seed;
use storefront_app::services::{DisabledImageStore, ImageStore, UploadError, UploadedImage};
use storefront_app::state::{AppState, Backends};
use storefront_app::web::{configure_app_routes, cors, security_headers};

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-pass";
const BOUNDARY: &str = "storefront-test-boundary";

static TRACING: Lazy<()> = Lazy::new(|| {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
    .with_test_writer()
    .try_init();
});

#[derive(Default)]
struct RecordingImageStore {
  uploads: Mutex<Vec<(Option<String>, Vec<u8>)>>,
}

#[async_trait]
impl ImageStore for RecordingImageStore {
  async fn upload(&self, file_name: Option<String>, bytes: Vec<u8>) -> Result<UploadedImage, UploadError> {
    let mut uploads = self.uploads.lock().unwrap();
    uploads.push((file_name, bytes));
    let public_id = format!("capstone/image_{}", uploads.len());
    Ok(UploadedImage {
      url: format!("https://images.example.com/{public_id}.png"),
      public_id,
    })
  }
}

struct Harness {
  state: AppState,
  users: Arc<dyn UserStore>,
  gateway: Arc<MockPaymentGateway>,
}

fn test_config() -> AppConfig {
  let vars: HashMap<&str, &str> = [
    ("DATABASE_URL", "postgres://unused/storefront"),
    ("JWT_SECRET", "api-test-secret"),
    ("PAYMENT_PROVIDER", "mock"),
  ]
  .into_iter()
  .collect();
  AppConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap()
}

fn harness_with_images(images: Arc<dyn ImageStore>) -> Harness {
  Lazy::force(&TRACING);
  let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
  let gateway = Arc::new(MockPaymentGateway::new());
  let backends = Backends {
    products: Arc::new(MemoryProductStore::new()) as Arc<dyn ProductStore>,
    users: users.clone(),
    orders: Arc::new(MemoryOrderStore::new()) as Arc<dyn OrderStore>,
    gateway: gateway.clone() as Arc<dyn PaymentGateway>,
    images,
  };
  Harness {
    state: AppState::new(Arc::new(test_config()), backends),
    users,
    gateway,
  }
}

fn harness() -> Harness {
  harness_with_images(Arc::new(RecordingImageStore::default()))
}

macro_rules! spawn_app {
  ($harness:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($harness.state.clone()))
        .wrap(security_headers())
        .wrap(cors(&$harness.state.config))
        .configure(configure_app_routes),
    )
    .await
  };
}

impl Harness {
  async fn user_token(&self, email: &str) -> String {
    self
      .state
      .identity
      .register(RegisterInput {
        name: Some("Ann".to_string()),
        email: Some(email.to_string()),
        password: Some("pw-123456".to_string()),
      })
      .await
      .unwrap()
      .token
  }

  async fn admin_token(&self) -> String {
    seed::ensure_admin(&self.users, ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
    self
      .state
      .identity
      .login(LoginInput {
        email: Some(ADMIN_EMAIL.to_string()),
        password: Some(ADMIN_PASSWORD.to_string()),
      })
      .await
      .unwrap()
      .token
  }
}

fn bearer(token: &str) -> (header::HeaderName, String) {
  (header::AUTHORIZATION, format!("Bearer {token}"))
}

fn reference_items() -> Value {
  json!([
    { "_id": "p-tee", "name": "Starter Tee", "price": 20, "qty": 2, "imageUrl": "" },
    { "_id": "p-shoes", "name": "Grip Shoes", "price": 75, "qty": 1 }
  ])
}

fn multipart_body(field: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
  let mut body = format!(
    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
  )
  .into_bytes();
  body.extend_from_slice(content);
  body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
  body
}

#[actix_web::test]
async fn health_reports_ok_with_security_headers() {
  let h = harness();
  let app = spawn_app!(h);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let csp = resp.headers().get(header::CONTENT_SECURITY_POLICY).unwrap().to_str().unwrap();
  assert!(csp.contains("script-src 'self' https://js.stripe.com"));
  assert!(csp.contains("connect-src 'self' https://api.stripe.com"));

  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "ok": true }));
}

#[actix_web::test]
async fn cors_preflight_allows_configured_origin() {
  let h = harness();
  let app = spawn_app!(h);

  let req = test::TestRequest::default()
    .method(Method::OPTIONS)
    .uri("/products")
    .insert_header((header::ORIGIN, "http://localhost:5173"))
    .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(
    resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
    "http://localhost:5173"
  );
}

#[actix_web::test]
async fn register_then_login() {
  let h = harness();
  let app = spawn_app!(h);

  let req = test::TestRequest::post()
    .uri("/auth/register")
    .set_json(json!({ "name": "Ann", "email": "  Ann@Example.com ", "password": "pw-123456" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
  assert_eq!(body["user"]["email"], "ann@example.com");
  assert_eq!(body["user"]["role"], "user");
  assert!(body["user"].get("password_hash").is_none());

  let req = test::TestRequest::post()
    .uri("/auth/register")
    .set_json(json!({ "name": "Ann", "email": "ann@example.com", "password": "other" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Email already in use");

  let req = test::TestRequest::post()
    .uri("/auth/login")
    .set_json(json!({ "email": "ann@example.com", "password": "pw-123456" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let req = test::TestRequest::post()
    .uri("/auth/login")
    .set_json(json!({ "email": "ann@example.com", "password": "wrong" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Invalid credentials");
}

#[actix_web::test]
async fn malformed_bodies_are_bad_requests() {
  let h = harness();
  let app = spawn_app!(h);

  let req = test::TestRequest::post()
    .uri("/auth/register")
    .set_json(json!({ "email": "ann@example.com" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Email and password required");

  let req = test::TestRequest::post()
    .uri("/auth/login")
    .insert_header((header::CONTENT_TYPE, "application/json"))
    .set_payload("{not json")
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON body"));
}

#[actix_web::test]
async fn product_admin_routes_check_role() {
  let h = harness();
  let user_token = h.user_token("ann@example.com").await;
  let admin_token = h.admin_token().await;
  let app = spawn_app!(h);
  let new_product = json!({ "name": "Chalk Bag", "price": "15.50", "categories": "Accessories, Climbing" });

  let req = test::TestRequest::post().uri("/products").set_json(&new_product).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "No token provided");

  let req = test::TestRequest::post()
    .uri("/products")
    .insert_header(bearer("not-a-token"))
    .set_json(&new_product)
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

  let req = test::TestRequest::post()
    .uri("/products")
    .insert_header(bearer(&user_token))
    .set_json(&new_product)
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Admin only");

  let req = test::TestRequest::post()
    .uri("/products")
    .insert_header(bearer(&admin_token))
    .set_json(&new_product)
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created: Value = test::read_body_json(resp).await;
  assert_eq!(created["name"], "Chalk Bag");
  assert_eq!(created["price"].as_f64(), Some(15.5));
  assert_eq!(created["categories"], json!(["Accessories", "Climbing"]));

  let req = test::TestRequest::post()
    .uri("/products")
    .insert_header(bearer(&admin_token))
    .set_json(json!({ "name": "Broken", "price": -1 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Invalid price");

  let id = created["id"].as_str().unwrap().to_string();
  let req = test::TestRequest::delete()
    .uri(&format!("/products/{id}"))
    .insert_header(bearer(&user_token))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn catalog_browse_and_delete() {
  let h = harness();
  let admin_token = h.admin_token().await;
  let app = spawn_app!(h);

  for (name, price, category) in [("Starter Tee", 20, "Clothing"), ("Grip Shoes", 75, "Footwear")] {
    let req = test::TestRequest::post()
      .uri("/products")
      .insert_header(bearer(&admin_token))
      .set_json(json!({ "name": name, "price": price, "categories": [category] }))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
  }

  let all: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/products").to_request()).await;
  assert_eq!(all.as_array().unwrap().len(), 2);

  let footwear: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get().uri("/products?category=Footwear").to_request(),
  )
  .await;
  assert_eq!(footwear.as_array().unwrap().len(), 1);
  assert_eq!(footwear[0]["name"], "Grip Shoes");

  let id = footwear[0]["id"].as_str().unwrap().to_string();
  let product: Value =
    test::call_and_read_body_json(&app, test::TestRequest::get().uri(&format!("/products/{id}")).to_request()).await;
  assert_eq!(product["name"], "Grip Shoes");

  let req = test::TestRequest::delete()
    .uri(&format!("/products/{id}"))
    .insert_header(bearer(&admin_token))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "ok": true }));

  let resp = test::call_service(&app, test::TestRequest::get().uri(&format!("/products/{id}")).to_request()).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/products/not-a-uuid").to_request()).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  // Unknown ids delete as a no-op.
  let req = test::TestRequest::delete()
    .uri(&format!("/products/{id}"))
    .insert_header(bearer(&admin_token))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn payment_intent_requires_login_and_charges_cart_total() {
  let h = harness();
  let token = h.user_token("ann@example.com").await;
  let app = spawn_app!(h);

  let req = test::TestRequest::post()
    .uri("/create-payment-intent")
    .set_json(json!({ "items": reference_items() }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
  assert!(h.gateway.requests().is_empty());

  let req = test::TestRequest::post()
    .uri("/create-payment-intent")
    .insert_header(bearer(&token))
    .set_json(json!({ "items": reference_items() }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["clientSecret"].as_str().unwrap().contains("_secret_"));

  let requests = h.gateway.requests();
  assert_eq!(requests.len(), 1);
  assert_eq!(requests[0].amount_cents, 11500);
  assert_eq!(requests[0].currency, "usd");
}

#[actix_web::test]
async fn payment_intent_rejects_bad_carts_before_the_processor() {
  let h = harness();
  let token = h.user_token("ann@example.com").await;
  let app = spawn_app!(h);

  let cases = [
    (json!({ "items": [] }), "No items"),
    (json!({}), "No items"),
    (
      json!({ "items": [{ "_id": "p", "name": "Sticker", "price": 0.30, "qty": 1 }] }),
      "Total must be at least 50 cents (got 30)",
    ),
  ];
  for (payload, message) in cases {
    let req = test::TestRequest::post()
      .uri("/create-payment-intent")
      .insert_header(bearer(&token))
      .set_json(payload)
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], message);
  }

  let req = test::TestRequest::post()
    .uri("/create-payment-intent")
    .insert_header(bearer(&token))
    .set_json(json!({ "items": [{ "_id": "p", "name": "Tee", "price": "abc", "qty": 1 }] }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

  assert!(h.gateway.requests().is_empty());
}

#[actix_web::test]
async fn orders_are_recorded_and_listed_by_owner() {
  let h = harness();
  let ann = h.user_token("ann@example.com").await;
  let bob = h.user_token("bob@example.com").await;
  let admin = h.admin_token().await;
  let app = spawn_app!(h);

  let req = test::TestRequest::post()
    .uri("/orders")
    .set_json(json!({ "items": reference_items(), "paymentId": "pi_1" }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

  let req = test::TestRequest::post()
    .uri("/orders")
    .insert_header(bearer(&ann))
    .set_json(json!({ "items": reference_items(), "paymentId": "pi_1" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let order: Value = test::read_body_json(resp).await;
  assert_eq!(order["total"].as_f64(), Some(115.0));
  assert_eq!(order["status"], "paid");
  assert_eq!(order["paymentId"], "pi_1");
  assert_eq!(order["user"]["email"], "ann@example.com");
  assert_eq!(order["items"][0]["productId"], "p-tee");
  assert_eq!(order["items"][0]["qty"], 2);

  let req = test::TestRequest::post()
    .uri("/orders")
    .insert_header(bearer(&ann))
    .set_json(json!({ "items": [{ "_id": "p", "name": "Free", "price": 0, "qty": 1 }] }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Order total must be > 0");

  let mine: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get().uri("/my/orders").insert_header(bearer(&ann)).to_request(),
  )
  .await;
  assert_eq!(mine.as_array().unwrap().len(), 1);

  let theirs: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get().uri("/my/orders").insert_header(bearer(&bob)).to_request(),
  )
  .await;
  assert!(theirs.as_array().unwrap().is_empty());

  let req = test::TestRequest::get().uri("/orders").insert_header(bearer(&ann)).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

  let all: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get().uri("/orders").insert_header(bearer(&admin)).to_request(),
  )
  .await;
  assert_eq!(all.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn upload_forwards_the_file_field() {
  let images = Arc::new(RecordingImageStore::default());
  let h = harness_with_images(images.clone());
  let user = h.user_token("ann@example.com").await;
  let admin = h.admin_token().await;
  let app = spawn_app!(h);
  let content_type = format!("multipart/form-data; boundary={BOUNDARY}");

  let req = test::TestRequest::post()
    .uri("/upload")
    .insert_header(bearer(&user))
    .insert_header((header::CONTENT_TYPE, content_type.clone()))
    .set_payload(multipart_body("file", "tee.png", b"PNGDATA"))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

  let req = test::TestRequest::post()
    .uri("/upload")
    .insert_header(bearer(&admin))
    .insert_header((header::CONTENT_TYPE, content_type.clone()))
    .set_payload(multipart_body("file", "tee.png", b"PNGDATA"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["public_id"], "capstone/image_1");
  assert!(body["url"].as_str().unwrap().starts_with("https://"));

  {
    let uploads = images.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].0.as_deref(), Some("tee.png"));
    assert_eq!(uploads[0].1, b"PNGDATA".to_vec());
  }

  let req = test::TestRequest::post()
    .uri("/upload")
    .insert_header(bearer(&admin))
    .insert_header((header::CONTENT_TYPE, content_type))
    .set_payload(multipart_body("photo", "tee.png", b"PNGDATA"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "No file provided");
  assert_eq!(images.uploads.lock().unwrap().len(), 1);
}

#[actix_web::test]
async fn upload_without_image_host_is_a_server_error() {
  let h = harness_with_images(Arc::new(DisabledImageStore));
  let admin = h.admin_token().await;
  let app = spawn_app!(h);

  let req = test::TestRequest::post()
    .uri("/upload")
    .insert_header(bearer(&admin))
    .insert_header((header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}")))
    .set_payload(multipart_body("file", "tee.png", b"PNGDATA"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Image uploads are not configured");
}
