//! Menu item repository.
//!
//! CRUD for the menu catalog plus the availability toggles the counter
//! staff flip during service (sold out, seasonal items, retired dishes).

use cafe_core::validation::{validate_category, validate_name, validate_price_paise};
use cafe_core::{MenuItem, Money};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Row shape for `menu_items`.
#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: String,
    name: String,
    category: String,
    description: Option<String>,
    price_paise: i64,
    is_available: bool,
    is_active: bool,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        MenuItem {
            id: row.id,
            name: row.name,
            category: row.category,
            description: row.description,
            price_paise: row.price_paise,
            is_available: row.is_available,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Parameters for creating a menu item.
#[derive(Debug, Clone)]
pub struct NewMenuItem {
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub price: Money,
}

/// Repository for menu catalog access.
#[derive(Debug, Clone)]
pub struct MenuItemRepository {
    pool: SqlitePool,
}

impl MenuItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new menu item and return it.
    pub async fn insert(&self, new: NewMenuItem) -> DbResult<MenuItem> {
        validate_name(&new.name)?;
        validate_category(&new.category)?;
        validate_price_paise(new.price.paise())?;

        let now = Utc::now();
        let item = MenuItem {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            category: new.category,
            description: new.description,
            price_paise: new.price.paise(),
            is_available: true,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %item.id, name = %item.name, "inserting menu item");

        sqlx::query(
            r#"
            INSERT INTO menu_items
                (id, name, category, description, price_paise,
                 is_available, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(&item.description)
        .bind(item.price_paise)
        .bind(item.is_available)
        .bind(item.is_active)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    /// Update name, category, description and price of an existing item.
    pub async fn update(&self, item: &MenuItem) -> DbResult<()> {
        validate_name(&item.name)?;
        validate_category(&item.category)?;
        validate_price_paise(item.price_paise)?;

        debug!(id = %item.id, "updating menu item");

        let result = sqlx::query(
            r#"
            UPDATE menu_items
            SET name = ?, category = ?, description = ?, price_paise = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&item.name)
        .bind(&item.category)
        .bind(&item.description)
        .bind(item.price_paise)
        .bind(Utc::now())
        .bind(&item.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("menu item", &item.id));
        }
        Ok(())
    }

    /// Fetch a single menu item, active or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MenuItem>> {
        let row = sqlx::query_as::<_, MenuItemRow>("SELECT * FROM menu_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(MenuItem::from))
    }

    /// All active items, available or not, ordered for menu display.
    pub async fn list_active(&self) -> DbResult<Vec<MenuItem>> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            "SELECT * FROM menu_items WHERE is_active = 1 ORDER BY category, name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    /// Items currently orderable (active and available).
    pub async fn list_available(&self) -> DbResult<Vec<MenuItem>> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            r#"
            SELECT * FROM menu_items
            WHERE is_active = 1 AND is_available = 1
            ORDER BY category, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    /// Active items within one category.
    pub async fn list_by_category(&self, category: &str) -> DbResult<Vec<MenuItem>> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            "SELECT * FROM menu_items WHERE is_active = 1 AND category = ? ORDER BY name",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    /// Flip the sold-out flag.
    pub async fn set_available(&self, id: &str, available: bool) -> DbResult<()> {
        debug!(id, available, "toggling menu item availability");

        let result =
            sqlx::query("UPDATE menu_items SET is_available = ?, updated_at = ? WHERE id = ?")
                .bind(available)
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("menu item", id));
        }
        Ok(())
    }

    /// Soft-delete: keep the row so historical orders still resolve,
    /// but hide it from every listing.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id, "soft-deleting menu item");

        let result = sqlx::query(
            "UPDATE menu_items SET is_active = 0, is_available = 0, updated_at = ? WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("menu item", id));
        }
        Ok(())
    }

    /// Number of active menu items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM menu_items WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0)
    }
}
