// app/src/lib.rs

//! HTTP server for the storefront: actix-web routes over the `storefront`
//! domain crate, Postgres storage, and the Stripe and Cloudinary clients.

pub mod config;
pub mod db;
pub mod errors;
pub mod seed;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod web;
