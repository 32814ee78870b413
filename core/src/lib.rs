// src/lib.rs

//! Storefront domain: catalog, identity and checkout.
//!
//! The crate knows nothing about HTTP or Postgres. It exposes:
//!  - Domain records (`models`) and the session-scoped [`Cart`].
//!  - Money rules: price/quantity coercion and minor-unit rounding.
//!  - [`CheckoutOrchestrator`], which turns a cart into a payment intent and,
//!    once paid, into an immutable order snapshot.
//!  - [`Catalog`] and [`Identity`] services.
//!  - Storage and payment-processor ports with in-memory implementations.
//!  - A small named-step pipeline runner the services are built on.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod identity;
pub mod models;
pub mod money;
pub mod payment;
pub mod store;
pub mod workflow;

pub use crate::cart::Cart;
pub use crate::catalog::{Catalog, NewProductInput};
pub use crate::checkout::{ChargeQuote, CheckoutOrchestrator, CheckoutSettings};
pub use crate::error::{CatalogError, CheckoutError, ErrorKind, IdentityError, PaymentError, StoreError};
pub use crate::identity::{AuthSession, Identity, LoginInput, RegisterInput, TokenSettings};
pub use crate::models::{CartItem, Order, OrderCustomer, OrderLine, OrderStatus, Principal, Product, PublicUser, Role, User};
pub use crate::payment::{MockPaymentGateway, PaymentGateway, PaymentIntent, PaymentIntentRequest};
pub use crate::workflow::{ContextData, Pipeline, PipelineOutcome, StepControl, WorkflowError};
