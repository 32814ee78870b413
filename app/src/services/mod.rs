// app/src/services/mod.rs

//! Outbound integrations: the payment processor and the image host.

pub mod cloudinary;
pub mod images;
pub mod stripe;

pub use cloudinary::CloudinaryImageStore;
pub use images::{DisabledImageStore, ImageStore, UploadError, UploadedImage};
pub use stripe::StripeGateway;
