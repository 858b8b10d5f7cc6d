//! Tax settings repository.
//!
//! The GST configuration is a singleton row (`id = 1`). Reads create the
//! row with the default 2.5% + 2.5% on-subtotal configuration if nobody
//! has saved one yet, so callers never deal with a missing-settings case.

use cafe_core::validation::validate_rate_bps;
use cafe_core::{TaxMethod, TaxSettings};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

#[derive(Debug, sqlx::FromRow)]
struct TaxSettingsRow {
    cgst_rate_bps: u32,
    sgst_rate_bps: u32,
    tax_method: TaxMethod,
}

impl From<TaxSettingsRow> for TaxSettings {
    fn from(row: TaxSettingsRow) -> Self {
        TaxSettings {
            cgst_rate_bps: row.cgst_rate_bps,
            sgst_rate_bps: row.sgst_rate_bps,
            method: row.tax_method,
        }
    }
}

/// Repository for the singleton GST configuration.
#[derive(Debug, Clone)]
pub struct TaxSettingsRepository {
    pool: SqlitePool,
}

impl TaxSettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch the settings, creating the default row on first read.
    pub async fn get(&self) -> DbResult<TaxSettings> {
        let row = sqlx::query_as::<_, TaxSettingsRow>(
            "SELECT cgst_rate_bps, sgst_rate_bps, tax_method FROM tax_settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(row.into());
        }

        let defaults = TaxSettings::default();
        debug!("no tax settings saved yet, seeding defaults");
        self.write(&defaults).await?;
        Ok(defaults)
    }

    /// Save new settings, replacing whatever is there.
    pub async fn update(&self, settings: &TaxSettings) -> DbResult<()> {
        validate_rate_bps(settings.cgst_rate_bps)?;
        validate_rate_bps(settings.sgst_rate_bps)?;

        debug!(
            cgst_bps = settings.cgst_rate_bps,
            sgst_bps = settings.sgst_rate_bps,
            method = ?settings.method,
            "updating tax settings"
        );
        self.write(settings).await
    }

    async fn write(&self, settings: &TaxSettings) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tax_settings (id, cgst_rate_bps, sgst_rate_bps, tax_method, updated_at)
            VALUES (1, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                cgst_rate_bps = excluded.cgst_rate_bps,
                sgst_rate_bps = excluded.sgst_rate_bps,
                tax_method = excluded.tax_method,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(settings.cgst_rate_bps)
        .bind(settings.sgst_rate_bps)
        .bind(settings.method)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn first_read_seeds_defaults() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let settings = db.tax_settings().get().await.unwrap();

        assert_eq!(settings.cgst_rate_bps, 250);
        assert_eq!(settings.sgst_rate_bps, 250);
        assert_eq!(settings.method, TaxMethod::OnSubtotal);
    }

    #[tokio::test]
    async fn update_replaces_the_singleton() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.tax_settings();

        repo.update(&TaxSettings {
            cgst_rate_bps: 900,
            sgst_rate_bps: 900,
            method: TaxMethod::OnDiscountedSubtotal,
        })
        .await
        .unwrap();

        let settings = repo.get().await.unwrap();
        assert_eq!(settings.cgst_rate_bps, 900);
        assert_eq!(settings.method, TaxMethod::OnDiscountedSubtotal);
    }

    #[tokio::test]
    async fn rejects_rate_over_one_hundred_percent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let result = db
            .tax_settings()
            .update(&TaxSettings {
                cgst_rate_bps: 10_001,
                sgst_rate_bps: 250,
                method: TaxMethod::OnSubtotal,
            })
            .await;
        assert!(result.is_err());
    }
}
