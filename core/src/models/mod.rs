// core/src/models/mod.rs

//! Domain records: catalog products, users and their token-derived
//! principals, client cart items and immutable order snapshots.

pub mod cart_item;
pub mod order;
pub mod order_line;
pub mod product;
pub mod user;

pub use cart_item::CartItem;
pub use order::{Order, OrderCustomer, OrderStatus};
pub use order_line::OrderLine;
pub use product::Product;
pub use user::{Principal, PublicUser, Role, User};
