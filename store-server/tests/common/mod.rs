//! Shared fixtures for integration tests
//!
//! Each test gets its own temp-dir SQLite database, seeded with two users
//! (a shopper and an admin verifier) and a small catalog.

// Not every fixture is used by every test binary
#![allow(dead_code)]

use std::sync::Arc;

use sqlx::SqlitePool;
use tempfile::TempDir;

use shared::models::{Product, User};
use store_server::auth::CurrentUser;
use store_server::db::DbService;
use store_server::db::repository::{cart, product, user};
use store_server::services::{CheckoutService, ExitPassSigner, UniformSource, VerifyService};

pub const SHOPPER_ID: i64 = 1001;
pub const ADMIN_ID: i64 = 9001;

pub const MILK: i64 = 1; // 2.49
pub const COFFEE: i64 = 2; // 19.99
pub const WHISKY: i64 = 3; // 49.99

const TEST_SECRET: &str = "integration-test-signing-secret";

/// Fixed uniform draw so the random-sampling audit rule is deterministic.
/// 0.99 never samples, 0.0 always does.
pub struct FixedDraw(pub f64);

impl UniformSource for FixedDraw {
    fn draw(&self) -> f64 {
        self.0
    }
}

pub struct TestStore {
    pub db: SqlitePool,
    pub signer: Arc<ExitPassSigner>,
    _dir: TempDir,
}

impl TestStore {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("store.db");
        let db = DbService::new(path.to_str().expect("utf-8 temp path"))
            .await
            .expect("open test database");

        let store = Self {
            db: db.pool,
            signer: Arc::new(ExitPassSigner::new(TEST_SECRET)),
            _dir: dir,
        };
        store.seed().await;
        store
    }

    async fn seed(&self) {
        for u in [
            User {
                id: SHOPPER_ID,
                email: "shopper@example.com".into(),
                first_name: "Sam".into(),
                last_name: "Shopper".into(),
                password_hash: "x".into(),
                is_admin: false,
            },
            User {
                id: ADMIN_ID,
                email: "guard@example.com".into(),
                first_name: "Gail".into(),
                last_name: "Guard".into(),
                password_hash: "x".into(),
                is_admin: true,
            },
        ] {
            user::insert(&self.db, &u).await.expect("seed user");
        }

        for p in [
            Product {
                id: MILK,
                barcode: "0001".into(),
                name: "Milk 1L".into(),
                price: 2.49,
            },
            Product {
                id: COFFEE,
                barcode: "0002".into(),
                name: "Coffee Beans".into(),
                price: 19.99,
            },
            Product {
                id: WHISKY,
                barcode: "0003".into(),
                name: "Single Malt".into(),
                price: 49.99,
            },
        ] {
            product::insert(&self.db, &p).await.expect("seed product");
        }
    }

    /// Checkout service with an injected audit draw
    pub fn checkout_service(&self, draw: f64) -> CheckoutService {
        CheckoutService::new(self.db.clone(), self.signer.clone(), Arc::new(FixedDraw(draw)))
    }

    pub fn verify_service(&self) -> VerifyService {
        VerifyService::new(self.db.clone(), self.signer.clone())
    }

    /// Put `(product_id, quantity)` lines into a user's cart
    pub async fn fill_cart(&self, user_id: i64, lines: &[(i64, i64)]) {
        for &(product_id, quantity) in lines {
            cart::set_item(&self.db, user_id, product_id, quantity)
                .await
                .expect("fill cart");
        }
    }

    /// Current cart lines for a user
    pub async fn cart_lines(&self, user_id: i64) -> Vec<shared::models::CartLine> {
        let mut conn = self.db.acquire().await.expect("acquire connection");
        cart::items_with_price(&mut *conn, user_id)
            .await
            .expect("read cart")
    }
}

pub fn shopper() -> CurrentUser {
    CurrentUser {
        id: SHOPPER_ID,
        email: "shopper@example.com".into(),
        is_admin: false,
    }
}

pub fn admin() -> CurrentUser {
    CurrentUser {
        id: ADMIN_ID,
        email: "guard@example.com".into(),
        is_admin: true,
    }
}
