//! # cafe-core: Pure Business Logic for the Café POS
//!
//! This crate is the **heart** of the café POS. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Café POS Architecture                          │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐    │
//! │  │                 Admin Panel (React SPA)                     │    │
//! │  │   Menu UI ──► Offers UI ──► Billing Preview ──► Orders UI   │    │
//! │  └─────────────────────────────┬───────────────────────────────┘    │
//! │                                │ JSON (ts-rs generated types)       │
//! │  ┌─────────────────────────────▼───────────────────────────────┐    │
//! │  │              ★ cafe-core (THIS CRATE) ★                     │    │
//! │  │                                                             │    │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌────────────┐         │    │
//! │  │  │  types  │ │  money  │ │ billing │ │ validation │         │    │
//! │  │  │ Offers  │ │  Money  │ │ GST +   │ │   rules    │         │    │
//! │  │  │ Orders  │ │  Rate   │ │ offers  │ │   checks   │         │    │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └────────────┘         │    │
//! │  │                                                             │    │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS         │    │
//! │  └─────────────────────────────┬───────────────────────────────┘    │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐    │
//! │  │                 cafe-db (Database Layer)                    │    │
//! │  │       SQLite repositories, migrations, billing service      │    │
//! │  └─────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MenuItem, DailyOffer, TaxSettings, Order, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`billing`] - The order billing calculator (offers, discounts, GST)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Injected State**: Tax settings and offers are passed in, never read from
//!    a global - the calculator can be tested without any database
//!
//! ## Example Usage
//!
//! ```rust
//! use cafe_core::billing::{calculate_billing, BillingOptions, ManualDiscount};
//! use cafe_core::money::Money;
//! use cafe_core::types::{Rate, TaxSettings};
//! use chrono::Utc;
//!
//! // ₹1000 order with a 10% manual discount, default GST (2.5% + 2.5%
//! // on the pre-discount subtotal).
//! let breakdown = calculate_billing(
//!     Money::from_paise(100_000),
//!     &[],
//!     &BillingOptions {
//!         discount: Some(ManualDiscount::Percentage(Rate::from_bps(1000))),
//!     },
//!     &TaxSettings::default(),
//!     None,
//!     Utc::now(),
//! );
//!
//! assert_eq!(breakdown.discounted_subtotal.paise(), 90_000);
//! assert_eq!(breakdown.total.paise(), 95_000); // ₹900 + ₹50 GST
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use cafe_core::Money` instead of
// `use cafe_core::money::Money`

pub use billing::{
    calculate_billing, evaluate_offer, BillingBreakdown, BillingOptions, ManualDiscount,
    OfferApplication, OfferSkipReason, OfferSummary,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single order
///
/// ## Business Reason
/// Prevents runaway orders and keeps kitchen tickets printable.
pub const MAX_ORDER_ITEMS: usize = 100;

/// Maximum quantity of a single line in an order
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Default CGST rate in basis points (2.5%, the restaurant-service slab).
pub const DEFAULT_CGST_BPS: u32 = 250;

/// Default SGST rate in basis points (2.5%).
pub const DEFAULT_SGST_BPS: u32 = 250;
