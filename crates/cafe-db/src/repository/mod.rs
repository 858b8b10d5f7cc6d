//! # Repository Module
//!
//! Database repository implementations for the café POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Repository Pattern Explained                      │
//! │                                                                     │
//! │  The Repository pattern abstracts database access behind a clean   │
//! │  API, one repository per aggregate:                                 │
//! │                                                                     │
//! │  Billing Service                                                    │
//! │       │  db.tax_settings().get()                                    │
//! │       │  db.offers().get_by_id(id)                                  │
//! │       ▼                                                             │
//! │  Repository ──► SQL ──► SQLite                                      │
//! │                                                                     │
//! │  Benefits:                                                          │
//! │  • SQL is isolated in one place per aggregate                       │
//! │  • The pure calculator in cafe-core never sees a connection         │
//! │  • Repositories can be exercised against in-memory SQLite           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`menu_item::MenuItemRepository`] - menu CRUD and availability
//! - [`offer::OfferRepository`] - daily offer CRUD and validity selection
//! - [`tax_settings::TaxSettingsRepository`] - the GST settings singleton
//! - [`order::OrderRepository`] - orders, line items, status lifecycle

pub mod menu_item;
pub mod offer;
pub mod order;
pub mod tax_settings;
