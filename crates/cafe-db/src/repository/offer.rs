//! Daily offer repository.
//!
//! Offers are stored with their scoping lists (categories, item ids,
//! weekdays) as JSON text columns. SQL only filters on the kill switch;
//! the date window and weekday checks run in Rust through
//! [`DailyOffer::is_valid_at`] so RFC 3339 strings never get compared
//! lexicographically inside SQLite.

use cafe_core::validation::validate_offer;
use cafe_core::DailyOffer;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Row shape for `daily_offers` with the JSON columns still as text.
#[derive(Debug, sqlx::FromRow)]
struct OfferRow {
    id: String,
    name: String,
    description: Option<String>,
    offer_type: cafe_core::OfferType,
    discount_value: i64,
    min_order_paise: i64,
    max_discount_paise: Option<i64>,
    applicable_categories: String,
    applicable_items: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    applicable_days: String,
    is_active: bool,
    priority: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OfferRow> for DailyOffer {
    type Error = DbError;

    fn try_from(row: OfferRow) -> Result<Self, Self::Error> {
        Ok(DailyOffer {
            id: row.id,
            name: row.name,
            description: row.description,
            offer_type: row.offer_type,
            discount_value: row.discount_value,
            min_order_paise: row.min_order_paise,
            max_discount_paise: row.max_discount_paise,
            applicable_categories: serde_json::from_str(&row.applicable_categories)?,
            applicable_items: serde_json::from_str(&row.applicable_items)?,
            start_date: row.start_date,
            end_date: row.end_date,
            applicable_days: serde_json::from_str(&row.applicable_days)?,
            is_active: row.is_active,
            priority: row.priority,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Parameters for creating a daily offer.
#[derive(Debug, Clone)]
pub struct NewOffer {
    pub name: String,
    pub description: Option<String>,
    pub offer_type: cafe_core::OfferType,
    pub discount_value: i64,
    pub min_order_paise: i64,
    pub max_discount_paise: Option<i64>,
    pub applicable_categories: Vec<String>,
    pub applicable_items: Vec<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub applicable_days: Vec<u8>,
    pub priority: i64,
}

/// Repository for daily offers.
#[derive(Debug, Clone)]
pub struct OfferRepository {
    pool: SqlitePool,
}

impl OfferRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new offer and return it.
    pub async fn insert(&self, new: NewOffer) -> DbResult<DailyOffer> {
        let now = Utc::now();
        let offer = DailyOffer {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            description: new.description,
            offer_type: new.offer_type,
            discount_value: new.discount_value,
            min_order_paise: new.min_order_paise,
            max_discount_paise: new.max_discount_paise,
            applicable_categories: new.applicable_categories,
            applicable_items: new.applicable_items,
            start_date: new.start_date,
            end_date: new.end_date,
            applicable_days: new.applicable_days,
            is_active: true,
            priority: new.priority,
            created_at: now,
            updated_at: now,
        };
        validate_offer(&offer)?;

        debug!(id = %offer.id, name = %offer.name, "inserting daily offer");

        sqlx::query(
            r#"
            INSERT INTO daily_offers
                (id, name, description, offer_type, discount_value,
                 min_order_paise, max_discount_paise,
                 applicable_categories, applicable_items,
                 start_date, end_date, applicable_days,
                 is_active, priority, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&offer.id)
        .bind(&offer.name)
        .bind(&offer.description)
        .bind(offer.offer_type)
        .bind(offer.discount_value)
        .bind(offer.min_order_paise)
        .bind(offer.max_discount_paise)
        .bind(serde_json::to_string(&offer.applicable_categories)?)
        .bind(serde_json::to_string(&offer.applicable_items)?)
        .bind(offer.start_date)
        .bind(offer.end_date)
        .bind(serde_json::to_string(&offer.applicable_days)?)
        .bind(offer.is_active)
        .bind(offer.priority)
        .bind(offer.created_at)
        .bind(offer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(offer)
    }

    /// Replace every editable field of an existing offer.
    pub async fn update(&self, offer: &DailyOffer) -> DbResult<()> {
        validate_offer(offer)?;

        debug!(id = %offer.id, "updating daily offer");

        let result = sqlx::query(
            r#"
            UPDATE daily_offers
            SET name = ?, description = ?, offer_type = ?, discount_value = ?,
                min_order_paise = ?, max_discount_paise = ?,
                applicable_categories = ?, applicable_items = ?,
                start_date = ?, end_date = ?, applicable_days = ?,
                priority = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&offer.name)
        .bind(&offer.description)
        .bind(offer.offer_type)
        .bind(offer.discount_value)
        .bind(offer.min_order_paise)
        .bind(offer.max_discount_paise)
        .bind(serde_json::to_string(&offer.applicable_categories)?)
        .bind(serde_json::to_string(&offer.applicable_items)?)
        .bind(offer.start_date)
        .bind(offer.end_date)
        .bind(serde_json::to_string(&offer.applicable_days)?)
        .bind(offer.priority)
        .bind(Utc::now())
        .bind(&offer.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("offer", &offer.id));
        }
        Ok(())
    }

    /// Fetch one offer by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<DailyOffer>> {
        let row = sqlx::query_as::<_, OfferRow>("SELECT * FROM daily_offers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(DailyOffer::try_from).transpose()
    }

    /// Every offer, newest first, for the back-office listing.
    pub async fn list_all(&self) -> DbResult<Vec<DailyOffer>> {
        let rows =
            sqlx::query_as::<_, OfferRow>("SELECT * FROM daily_offers ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(DailyOffer::try_from).collect()
    }

    /// Offers usable at `at`, highest priority first.
    ///
    /// SQL narrows to active rows; the window and weekday checks happen
    /// in Rust where the calendar rules live.
    pub async fn list_valid_at(&self, at: DateTime<Utc>) -> DbResult<Vec<DailyOffer>> {
        let rows =
            sqlx::query_as::<_, OfferRow>("SELECT * FROM daily_offers WHERE is_active = 1")
                .fetch_all(&self.pool)
                .await?;

        let mut offers: Vec<DailyOffer> = rows
            .into_iter()
            .map(DailyOffer::try_from)
            .collect::<DbResult<Vec<_>>>()?
            .into_iter()
            .filter(|offer| offer.is_valid_at(at))
            .collect();
        offers.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.name.cmp(&b.name)));
        Ok(offers)
    }

    /// Flip the kill switch without touching anything else.
    pub async fn set_active(&self, id: &str, active: bool) -> DbResult<()> {
        debug!(id, active, "toggling offer");

        let result =
            sqlx::query("UPDATE daily_offers SET is_active = ?, updated_at = ? WHERE id = ?")
                .bind(active)
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("offer", id));
        }
        Ok(())
    }

    /// Delete an offer outright. Historical orders keep their frozen
    /// breakdown, so no foreign key blocks this.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id, "deleting offer");

        let result = sqlx::query("DELETE FROM daily_offers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("offer", id));
        }
        Ok(())
    }

    /// Number of stored offers, active or not.
    pub async fn count(&self) -> DbResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM daily_offers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use cafe_core::OfferType;
    use chrono::TimeZone;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn week_long_offer(name: &str, priority: i64) -> NewOffer {
        NewOffer {
            name: name.to_string(),
            description: None,
            offer_type: OfferType::Percentage,
            discount_value: 1000,
            min_order_paise: 0,
            max_discount_paise: None,
            applicable_categories: vec![],
            applicable_items: vec![],
            start_date: Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2026, 3, 7, 23, 59, 59).unwrap(),
            applicable_days: vec![],
            priority,
        }
    }

    #[tokio::test]
    async fn scoping_lists_survive_the_json_columns() {
        let db = test_db().await;
        let repo = db.offers();

        let mut new = week_long_offer("Beverage Tuesday", 0);
        new.applicable_categories = vec!["beverages".to_string()];
        new.applicable_items = vec!["item-7".to_string()];
        new.applicable_days = vec![2];

        let offer = repo.insert(new).await.unwrap();
        let fetched = repo.get_by_id(&offer.id).await.unwrap().unwrap();

        assert_eq!(fetched.applicable_categories, vec!["beverages"]);
        assert_eq!(fetched.applicable_items, vec!["item-7"]);
        assert_eq!(fetched.applicable_days, vec![2]);
    }

    #[tokio::test]
    async fn list_valid_at_filters_window_and_sorts_by_priority() {
        let db = test_db().await;
        let repo = db.offers();

        repo.insert(week_long_offer("Low", 1)).await.unwrap();
        repo.insert(week_long_offer("High", 10)).await.unwrap();

        let mut stale = week_long_offer("Expired", 99);
        stale.start_date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        stale.end_date = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        repo.insert(stale).await.unwrap();

        // 2026-03-02 falls inside the week-long window
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let valid = repo.list_valid_at(at).await.unwrap();

        let names: Vec<&str> = valid.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Low"]);
    }

    #[tokio::test]
    async fn kill_switch_removes_offer_from_valid_listing() {
        let db = test_db().await;
        let repo = db.offers();

        let offer = repo.insert(week_long_offer("Flash", 0)).await.unwrap();
        repo.set_active(&offer.id, false).await.unwrap();

        let at = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        assert!(repo.list_valid_at(at).await.unwrap().is_empty());
        // still visible to the back office
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_percentage_over_one_hundred() {
        let db = test_db().await;
        let repo = db.offers();

        let mut bad = week_long_offer("Too generous", 0);
        bad.discount_value = 12_000;
        assert!(repo.insert(bad).await.is_err());
    }
}
