//! # Café POS Database Layer
//!
//! SQLite persistence for the café POS, built on sqlx.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        cafe-db Architecture                         │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                     BillingService                            │  │
//! │  │   preview / place_order: lookups + frozen breakdowns          │  │
//! │  └───────────────┬───────────────────────────────────────────────┘  │
//! │                  │ uses                                             │
//! │  ┌───────────────▼───────────────────────────────────────────────┐  │
//! │  │                     Repositories                              │  │
//! │  │   MenuItem │ Offer │ TaxSettings │ Order                      │  │
//! │  └───────────────┬───────────────────────────────────────────────┘  │
//! │                  │ SqlitePool                                       │
//! │  ┌───────────────▼───────────────────────────────────────────────┐  │
//! │  │           SQLite (WAL, foreign keys on, embedded              │  │
//! │  │           migrations from migrations/sqlite)                  │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! │                                                                     │
//! │  Pure pricing logic lives in cafe-core and is imported, never       │
//! │  duplicated here.                                                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```no_run
//! use cafe_db::{Database, DbConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cafe_db::DbError> {
//!     let db = Database::new(DbConfig::new("cafe.db")).await?;
//!     let menu = db.menu_items().list_available().await?;
//!     println!("{} items on the menu", menu.len());
//!     Ok(())
//! }
//! ```

pub mod billing;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use billing::{BillingRequest, BillingService, OrderLine};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::menu_item::{MenuItemRepository, NewMenuItem};
pub use repository::offer::{NewOffer, OfferRepository};
pub use repository::order::OrderRepository;
pub use repository::tax_settings::TaxSettingsRepository;
