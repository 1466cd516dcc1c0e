use crate::db::traits::{CredentialStore, ProductStore};
use crate::types::{
    AppError, AuthError, Category, NewProduct, Product, ProductPatch, Result, User,
};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{params, Builder, Connection, Database, Row, Value};

const PRODUCT_COLUMNS: &str = "id, owner_id, name, category, description, price, image_url, stock, created_at, updated_at";

/// libsql-backed store for users and products.
///
/// Holds a single connection handle shared by all requests; the engine
/// serialises statements on it, and each public operation is one statement.
pub struct TursoClient {
    // Kept alive for the lifetime of the connection
    _db: Database,
    conn: Connection,
}

impl TursoClient {
    /// Ephemeral in-memory database.
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    /// File-based SQLite database, created if missing.
    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        Self::from_database(db).await
    }

    /// Remote Turso database.
    #[cfg(feature = "turso")]
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Turso: {}", e)))?;

        Self::from_database(db).await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let client = Self { _db: db, conn };
        client.initialize_schema().await?;

        Ok(client)
    }

    pub fn connection(&self) -> Connection {
        self.conn.clone()
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection();

        // Users table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                name TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        // Products table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                name TEXT NOT NULL,
                category TEXT NOT NULL CHECK (category IN ('dog', 'cat', 'bird', 'fish', 'other')),
                description TEXT NOT NULL,
                price REAL NOT NULL CHECK (price >= 0),
                image_url TEXT,
                stock INTEGER NOT NULL DEFAULT 50 CHECK (stock >= 0),
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                FOREIGN KEY (owner_id) REFERENCES users(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create products table: {}", e)))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_products_owner ON products(owner_id)",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create products index: {}", e)))?;

        Ok(())
    }

    async fn query_user(&self, sql: &str, value: &str) -> Result<Option<UserRecord>> {
        let mut rows = self
            .connection()
            .query(sql, [value])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl CredentialStore for TursoClient {
    async fn insert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().timestamp();

        self.connection()
            .execute(
                "INSERT INTO users (id, email, password_hash, name, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                (id.as_str(), email, password_hash, name, now, now),
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Auth(AuthError::AlreadyExists)
                } else {
                    AppError::Database(format!("Failed to create user: {}", e))
                }
            })?;

        Ok(UserRecord {
            id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        self.query_user(
            "SELECT id, email, password_hash, name, created_at, updated_at
             FROM users WHERE email = ?",
            email,
        )
        .await
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        self.query_user(
            "SELECT id, email, password_hash, name, created_at, updated_at
             FROM users WHERE id = ?",
            id,
        )
        .await
    }
}

#[async_trait]
impl ProductStore for TursoClient {
    async fn insert_product(&self, owner_id: &str, product: &NewProduct) -> Result<Product> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().timestamp();

        self.connection()
            .execute(
                &format!(
                    "INSERT INTO products ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    PRODUCT_COLUMNS
                ),
                params![
                    id.as_str(),
                    owner_id,
                    product.name.as_str(),
                    product.category.as_str(),
                    product.description.as_str(),
                    product.price,
                    product.image_url.clone(),
                    product.stock,
                    now,
                    now,
                ],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create product: {}", e)))?;

        Ok(Product {
            id,
            name: product.name.clone(),
            category: product.category,
            description: product.description.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            stock: product.stock,
            owner_id: owner_id.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Product>> {
        let mut rows = self
            .connection()
            .query(
                &format!(
                    "SELECT {} FROM products WHERE owner_id = ? ORDER BY rowid ASC",
                    PRODUCT_COLUMNS
                ),
                [owner_id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query products: {}", e)))?;

        let mut products = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            products.push(product_from_row(&row)?);
        }

        Ok(products)
    }

    async fn update_by_id_and_owner(
        &self,
        id: &str,
        owner_id: &str,
        patch: &ProductPatch,
    ) -> Result<Option<Product>> {
        let now = Utc::now().timestamp();

        let mut rows = self
            .connection()
            .query(
                &format!(
                    "UPDATE products SET
                        name = COALESCE(?, name),
                        category = COALESCE(?, category),
                        description = COALESCE(?, description),
                        price = COALESCE(?, price),
                        image_url = COALESCE(?, image_url),
                        stock = COALESCE(?, stock),
                        updated_at = ?
                     WHERE id = ? AND owner_id = ?
                     RETURNING {}",
                    PRODUCT_COLUMNS
                ),
                params![
                    patch.name.clone(),
                    patch.category.map(|c| c.as_str()),
                    patch.description.clone(),
                    patch.price,
                    patch.image_url.clone(),
                    patch.stock,
                    now,
                    id,
                    owner_id,
                ],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to update product: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(product_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete_by_id_and_owner(&self, id: &str, owner_id: &str) -> Result<bool> {
        let affected = self
            .connection()
            .execute(
                "DELETE FROM products WHERE id = ? AND owner_id = ?",
                (id, owner_id),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete product: {}", e)))?;

        Ok(affected > 0)
    }
}

const SQLITE_CONSTRAINT: i32 = 19;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

/// Matches the extended `SQLITE_CONSTRAINT_UNIQUE` code, or the primary
/// `SQLITE_CONSTRAINT` code when extended result codes are off. The only
/// constraint the users insert can break is `UNIQUE(email)`.
fn is_unique_violation(err: &libsql::Error) -> bool {
    matches!(
        err,
        libsql::Error::SqliteFailure(code, _)
            if *code == SQLITE_CONSTRAINT_UNIQUE || *code == SQLITE_CONSTRAINT
    )
}

fn db_err(e: libsql::Error) -> AppError {
    AppError::Database(e.to_string())
}

fn user_from_row(row: &Row) -> Result<UserRecord> {
    Ok(UserRecord {
        id: row.get(0).map_err(db_err)?,
        email: row.get(1).map_err(db_err)?,
        password_hash: row.get(2).map_err(db_err)?,
        name: row.get(3).map_err(db_err)?,
        created_at: row.get(4).map_err(db_err)?,
        updated_at: row.get(5).map_err(db_err)?,
    })
}

fn product_from_row(row: &Row) -> Result<Product> {
    let category: String = row.get(3).map_err(db_err)?;
    let category = category
        .parse::<Category>()
        .map_err(|_| AppError::Database(format!("Unknown category '{}' in store", category)))?;

    let image_url = match row.get_value(6).map_err(db_err)? {
        Value::Text(url) => Some(url),
        _ => None,
    };

    Ok(Product {
        id: row.get(0).map_err(db_err)?,
        owner_id: row.get(1).map_err(db_err)?,
        name: row.get(2).map_err(db_err)?,
        category,
        description: row.get(4).map_err(db_err)?,
        price: row.get(5).map_err(db_err)?,
        image_url,
        stock: row.get(7).map_err(db_err)?,
        created_at: row.get(8).map_err(db_err)?,
        updated_at: row.get(9).map_err(db_err)?,
    })
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
        }
    }
}
