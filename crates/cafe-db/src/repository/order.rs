//! Order repository.
//!
//! Orders freeze their full billing breakdown at creation time. The rows
//! never recompute anything: menu price edits, offer changes and tax rate
//! changes leave history untouched.

use cafe_core::{Order, OrderItem, OrderStatus};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: String,
    status: OrderStatus,
    customer_name: Option<String>,
    subtotal_paise: i64,
    discount_paise: i64,
    offer_discount_paise: i64,
    applied_offer_id: Option<String>,
    applied_offer_name: Option<String>,
    discounted_subtotal_paise: i64,
    cgst_rate_bps: u32,
    sgst_rate_bps: u32,
    cgst_paise: i64,
    sgst_paise: i64,
    total_paise: i64,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            order_number: row.order_number,
            status: row.status,
            customer_name: row.customer_name,
            subtotal_paise: row.subtotal_paise,
            discount_paise: row.discount_paise,
            offer_discount_paise: row.offer_discount_paise,
            applied_offer_id: row.applied_offer_id,
            applied_offer_name: row.applied_offer_name,
            discounted_subtotal_paise: row.discounted_subtotal_paise,
            cgst_rate_bps: row.cgst_rate_bps,
            sgst_rate_bps: row.sgst_rate_bps,
            cgst_paise: row.cgst_paise,
            sgst_paise: row.sgst_paise,
            total_paise: row.total_paise,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
            completed_at: row.completed_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: String,
    order_id: String,
    menu_item_id: String,
    name_snapshot: String,
    category_snapshot: String,
    unit_price_paise: i64,
    quantity: i64,
    line_total_paise: i64,
    created_at: DateTime<Utc>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            menu_item_id: row.menu_item_id,
            name_snapshot: row.name_snapshot,
            category_snapshot: row.category_snapshot,
            unit_price_paise: row.unit_price_paise,
            quantity: row.quantity,
            line_total_paise: row.line_total_paise,
            created_at: row.created_at,
        }
    }
}

/// Repository for orders and their line items.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an order and all of its line items in one transaction.
    pub async fn insert(&self, order: &Order, items: &[OrderItem]) -> DbResult<()> {
        debug!(
            id = %order.id,
            number = %order.order_number,
            lines = items.len(),
            total_paise = order.total_paise,
            "inserting order"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders
                (id, order_number, status, customer_name,
                 subtotal_paise, discount_paise, offer_discount_paise,
                 applied_offer_id, applied_offer_name, discounted_subtotal_paise,
                 cgst_rate_bps, sgst_rate_bps, cgst_paise, sgst_paise, total_paise,
                 notes, created_at, updated_at, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&order.id)
        .bind(&order.order_number)
        .bind(order.status)
        .bind(&order.customer_name)
        .bind(order.subtotal_paise)
        .bind(order.discount_paise)
        .bind(order.offer_discount_paise)
        .bind(&order.applied_offer_id)
        .bind(&order.applied_offer_name)
        .bind(order.discounted_subtotal_paise)
        .bind(order.cgst_rate_bps)
        .bind(order.sgst_rate_bps)
        .bind(order.cgst_paise)
        .bind(order.sgst_paise)
        .bind(order.total_paise)
        .bind(&order.notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .bind(order.completed_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items
                    (id, order_id, menu_item_id, name_snapshot, category_snapshot,
                     unit_price_paise, quantity, line_total_paise, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.menu_item_id)
            .bind(&item.name_snapshot)
            .bind(&item.category_snapshot)
            .bind(item.unit_price_paise)
            .bind(item.quantity)
            .bind(item.line_total_paise)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Fetch one order by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Order::from))
    }

    /// Line items for one order, in insertion order.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT * FROM order_items WHERE order_id = ? ORDER BY rowid",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    /// Move an order through its lifecycle.
    ///
    /// The UPDATE carries the expected current status so two tickets
    /// racing on the same order cannot both win.
    pub async fn update_status(&self, id: &str, next: OrderStatus) -> DbResult<Order> {
        let current = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("order", id))?;

        if !current.status.can_transition_to(next) {
            return Err(cafe_core::CoreError::InvalidStatusTransition {
                order_id: id.to_string(),
                from: current.status,
                to: next,
            }
            .into());
        }

        let now = Utc::now();
        let completed_at = if next == OrderStatus::Completed {
            Some(now)
        } else {
            current.completed_at
        };

        debug!(id, from = ?current.status, to = ?next, "order status transition");

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = ?, completed_at = ?, updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(next)
        .bind(completed_at)
        .bind(now)
        .bind(id)
        .bind(current.status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // somebody moved the order between our read and write
            return Err(cafe_core::CoreError::InvalidStatusTransition {
                order_id: id.to_string(),
                from: current.status,
                to: next,
            }
            .into());
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("order", id))
    }

    /// Most recent orders first.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT * FROM orders ORDER BY created_at DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Open orders for the kitchen display (pending, preparing, ready).
    pub async fn list_open(&self) -> DbResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT * FROM orders
            WHERE status IN ('pending', 'preparing', 'ready')
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Total number of orders ever placed.
    pub async fn count(&self) -> DbResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    /// Next ticket number, `YYYYMMDD-NNNN`, scoped to the current day.
    ///
    /// Derived from the highest issued number, not a row count, so a
    /// concurrent checkout that wins the insert bumps the sequence for
    /// everyone. The read and the insert are still separate statements;
    /// callers placing orders retry on a number collision.
    pub async fn next_order_number(&self, at: DateTime<Utc>) -> DbResult<String> {
        let day = at.format("%Y%m%d").to_string();
        let prefix = format!("{day}-%");
        let max: (Option<String>,) =
            sqlx::query_as("SELECT MAX(order_number) FROM orders WHERE order_number LIKE ?")
                .bind(prefix)
                .fetch_one(&self.pool)
                .await?;

        let last_seq = max
            .0
            .and_then(|number| {
                number
                    .rsplit('-')
                    .next()
                    .and_then(|seq| seq.parse::<i64>().ok())
            })
            .unwrap_or(0);
        Ok(format!("{day}-{:04}", last_seq + 1))
    }
}
