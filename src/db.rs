use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Create users table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'vendor',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Create stores table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS stores (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            subdomain TEXT NOT NULL UNIQUE,
            contact_email TEXT NOT NULL,
            description TEXT,
            maker_bio TEXT,
            welcome_message TEXT,
            policies TEXT,
            logo_url TEXT,
            banner_url TEXT,
            status TEXT NOT NULL DEFAULT 'pending',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (owner_id) REFERENCES users(id)
        );
        CREATE INDEX IF NOT EXISTS idx_stores_owner_id ON stores(owner_id);
        CREATE INDEX IF NOT EXISTS idx_stores_status ON stores(status);
        "#
        .to_owned(),
    ))
    .await?;

    // Create products table. Live fields are what shoppers see; draft_*
    // columns hold values staged by a pending product_update change request.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            store_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            price REAL NOT NULL,
            image_url TEXT,
            active INTEGER NOT NULL DEFAULT 1,
            moderation_status TEXT NOT NULL DEFAULT 'approved',
            has_pending_changes INTEGER NOT NULL DEFAULT 0,
            draft_name TEXT,
            draft_description TEXT,
            draft_price REAL,
            draft_image_url TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (store_id) REFERENCES stores(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_products_store_id ON products(store_id);
        CREATE INDEX IF NOT EXISTS idx_products_active ON products(active);
        CREATE INDEX IF NOT EXISTS idx_products_moderation_status ON products(moderation_status);
        "#
        .to_owned(),
    ))
    .await?;

    // Create change_requests table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS change_requests (
            id TEXT PRIMARY KEY,
            store_id INTEGER NOT NULL,
            product_id INTEGER,
            change_type TEXT NOT NULL,
            new_data TEXT NOT NULL,
            moderation_severity TEXT NOT NULL DEFAULT 'none',
            status TEXT NOT NULL DEFAULT 'pending',
            reviewer_id INTEGER,
            reviewed_at TEXT,
            rejection_reason TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (store_id) REFERENCES stores(id) ON DELETE CASCADE,
            FOREIGN KEY (product_id) REFERENCES products(id),
            FOREIGN KEY (reviewer_id) REFERENCES users(id)
        );
        CREATE INDEX IF NOT EXISTS idx_change_requests_status ON change_requests(status);
        CREATE INDEX IF NOT EXISTS idx_change_requests_store_id ON change_requests(store_id);
        "#
        .to_owned(),
    ))
    .await?;

    // Create moderation_log table (append-only)
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS moderation_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            content_type TEXT NOT NULL,
            store_id INTEGER NOT NULL,
            product_id INTEGER,
            is_violation INTEGER NOT NULL DEFAULT 0,
            severity TEXT NOT NULL DEFAULT 'none',
            categories TEXT NOT NULL DEFAULT '[]',
            reason TEXT NOT NULL DEFAULT '',
            confidence REAL NOT NULL DEFAULT 0,
            checked_at TEXT NOT NULL,
            FOREIGN KEY (store_id) REFERENCES stores(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_moderation_log_store_id ON moderation_log(store_id);
        CREATE INDEX IF NOT EXISTS idx_moderation_log_checked_at ON moderation_log(checked_at);
        "#
        .to_owned(),
    ))
    .await?;

    Ok(())
}
