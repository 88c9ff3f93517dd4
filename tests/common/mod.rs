//! 集成测试共享夹具
//!
//! Every test gets its own on-disk SQLite database in a temp directory,
//! opened through [`DbService`] so WAL mode and migrations match
//! production exactly.

#![allow(dead_code)]

use market_server::db::DbService;
use market_server::db::models::{Product, ProductCreate, Role, User, UserCreate};
use market_server::db::repository::{product as product_repo, user as user_repo};
use sqlx::SqlitePool;
use tempfile::TempDir;

pub struct TestDb {
    pub pool: SqlitePool,
    // Keeps the temp directory alive for the lifetime of the pool
    _dir: TempDir,
}

pub async fn setup() -> TestDb {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("market.db");
    let db = DbService::new(path.to_str().expect("utf8 temp path"))
        .await
        .expect("open test database");
    TestDb {
        pool: db.pool,
        _dir: dir,
    }
}

pub async fn create_user(pool: &SqlitePool, username: &str, role: Role) -> User {
    user_repo::create(
        pool,
        UserCreate {
            username: username.to_string(),
            // 测试不走登录, 哈希内容无关紧要
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$unused$unused".to_string(),
            role,
        },
    )
    .await
    .expect("create user")
}

pub async fn create_product(
    pool: &SqlitePool,
    seller: &User,
    name: &str,
    price: f64,
    discount: f64,
    stock: i64,
) -> Product {
    product_repo::create(
        pool,
        seller.id,
        ProductCreate {
            name: name.to_string(),
            description: None,
            price,
            discount,
            stock_quantity: stock,
            is_available: true,
        },
    )
    .await
    .expect("create product")
}

pub async fn reload_product(pool: &SqlitePool, id: i64) -> Product {
    product_repo::find_by_id(pool, id)
        .await
        .expect("reload product")
        .expect("product exists")
}
