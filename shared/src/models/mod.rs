//! Domain Models
//!
//! Plain serde types shared between the server and its tooling.
//! Database mapping (`sqlx::FromRow`) is feature-gated behind `db` so
//! non-database consumers stay lightweight.

pub mod cart;
pub mod product;
pub mod transaction;
pub mod user;

pub use cart::CartLine;
pub use product::Product;
pub use transaction::{
    CheckoutResponse, Transaction, TransactionDetail, TransactionItem, TransactionItemDetail,
    VerifiedTransaction,
};
pub use user::{CustomerSummary, User};
