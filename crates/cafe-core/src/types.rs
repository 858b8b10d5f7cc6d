//! # Domain Types
//!
//! Core domain types for the café POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐          │
//! │  │   MenuItem    │   │  DailyOffer   │   │     Order     │          │
//! │  │ ───────────── │   │ ───────────── │   │ ───────────── │          │
//! │  │ id (UUID)     │   │ id (UUID)     │   │ id (UUID)     │          │
//! │  │ category      │   │ offer_type    │   │ order_number  │          │
//! │  │ price_paise   │   │ validity      │   │ status        │          │
//! │  │ is_available  │   │ scoping       │   │ total_paise   │          │
//! │  └───────────────┘   └───────────────┘   └───────────────┘          │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐          │
//! │  │     Rate      │   │  TaxSettings  │   │  OrderStatus  │          │
//! │  │ ───────────── │   │ ───────────── │   │ ───────────── │          │
//! │  │ bps (u32)     │   │ cgst, sgst    │   │ Pending       │          │
//! │  │ 250 = 2.5%    │   │ tax method    │   │ Preparing ... │          │
//! │  └───────────────┘   └───────────────┘   └───────────────┘          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists (order_number) - human-readable

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A percentage rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 250 bps = 2.5% (the common CGST/SGST split for restaurant service)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        Rate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// An item on the café menu.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the menu and on the bill.
    pub name: String,

    /// Menu category label ("beverages", "desserts", "art-prints", ...).
    /// Offer scoping matches against this label.
    pub category: String,

    /// Optional description for the menu card.
    pub description: Option<String>,

    /// Price in paise.
    pub price_paise: i64,

    /// Whether the kitchen can currently serve this item.
    /// Toggled off for out-of-stock specials without delisting them.
    pub is_available: bool,

    /// Whether the item is active (soft delete).
    pub is_active: bool,

    /// When the item was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the item was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl MenuItem {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise)
    }

    /// Checks whether the item can currently be ordered.
    #[inline]
    pub fn can_order(&self) -> bool {
        self.is_active && self.is_available
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A priced order line as supplied to the billing calculator.
///
/// The calculator uses line items ONLY to test offer applicability
/// (category / item-id membership). It never re-derives the subtotal
/// from them; the caller owns that sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Menu item id (UUID).
    pub item_id: String,

    /// Category label at the time of ordering (frozen).
    pub category: String,

    /// Quantity ordered.
    pub quantity: i64,

    /// Unit price in paise at the time of ordering (frozen).
    pub unit_price_paise: i64,
}

impl LineItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }

    /// Calculates the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Daily Offer
// =============================================================================

/// How an offer's discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OfferType {
    /// `discount_value` is a rate in basis points, applied to the subtotal.
    Percentage,
    /// `discount_value` is an absolute amount in paise.
    Fixed,
}

/// A time-boxed, optionally scoped promotional discount.
///
/// ## Validity vs Applicability
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────┐
/// │  An offer contributes to a bill only if ALL of these hold:          │
/// │                                                                     │
/// │  VALIDITY (is_valid_at)                                             │
/// │    is_active                                                        │
/// │    AND start_date <= now <= end_date   (both ends inclusive)        │
/// │    AND (applicable_days empty OR weekday(now) ∈ applicable_days)    │
/// │                                                                     │
/// │  ELIGIBILITY                                                        │
/// │    subtotal >= min_order_paise                                      │
/// │                                                                     │
/// │  APPLICABILITY (matches_items) - inclusive OR, not AND              │
/// │    both scoping lists empty                                         │
/// │    OR any line's category ∈ applicable_categories                   │
/// │    OR any line's item id  ∈ applicable_items                        │
/// └─────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyOffer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name ("Monsoon Monday", "Artist Week 10% off", ...).
    pub name: String,

    /// Optional description shown to customers.
    pub description: Option<String>,

    /// Interpretation of `discount_value`.
    pub offer_type: OfferType,

    /// Basis points when `offer_type` is Percentage, paise when Fixed.
    /// Non-negative; percentage values stay within 0-10000 bps.
    pub discount_value: i64,

    /// Subtotal floor for eligibility, in paise.
    pub min_order_paise: i64,

    /// Cap on the computed discount, in paise.
    /// Only meaningful for percentage offers.
    pub max_discount_paise: Option<i64>,

    /// Category labels the offer is scoped to. Empty = all categories.
    pub applicable_categories: Vec<String>,

    /// Menu item ids the offer is scoped to. Empty = all items.
    pub applicable_items: Vec<String>,

    /// Start of the validity window (inclusive).
    #[ts(as = "String")]
    pub start_date: DateTime<Utc>,

    /// End of the validity window (inclusive).
    #[ts(as = "String")]
    pub end_date: DateTime<Utc>,

    /// Weekdays the offer runs on, 0 = Sunday .. 6 = Saturday.
    /// Empty = every day.
    pub applicable_days: Vec<u8>,

    /// Kill-switch: an inactive offer never applies.
    pub is_active: bool,

    /// Tie-break ordering when several offers could apply (higher wins).
    /// Ordering happens in the repository; the calculator receives one
    /// pre-selected offer.
    pub priority: i64,

    /// When the offer was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the offer was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl DailyOffer {
    /// Whether the offer is valid at the given instant.
    ///
    /// Both window bounds are inclusive: an offer whose `end_date` equals
    /// `at` exactly is still valid; one millisecond later it is not.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        if at < self.start_date || at > self.end_date {
            return false;
        }
        if self.applicable_days.is_empty() {
            return true;
        }
        let weekday = at.weekday().num_days_from_sunday() as u8;
        self.applicable_days.contains(&weekday)
    }

    /// Whether the offer's scoping lists match the given order lines.
    ///
    /// Inclusive OR: a line matching EITHER the category list or the item
    /// list qualifies. Two empty lists mean the offer is unscoped.
    pub fn matches_items(&self, items: &[LineItem]) -> bool {
        if self.applicable_categories.is_empty() && self.applicable_items.is_empty() {
            return true;
        }
        items.iter().any(|line| {
            self.applicable_categories.contains(&line.category)
                || self.applicable_items.contains(&line.item_id)
        })
    }

    /// Returns the percentage rate for a percentage offer.
    ///
    /// `discount_value` is validated to 0-10000 bps at the edge, so the
    /// cast is safe for well-formed offers.
    #[inline]
    pub fn percentage_rate(&self) -> Rate {
        Rate::from_bps(self.discount_value.clamp(0, 10000) as u32)
    }

    /// Returns the absolute amount for a fixed offer.
    #[inline]
    pub fn fixed_amount(&self) -> Money {
        Money::from_paise(self.discount_value)
    }

    /// Returns the discount cap, if configured.
    #[inline]
    pub fn max_discount(&self) -> Option<Money> {
        self.max_discount_paise.map(Money::from_paise)
    }
}

// =============================================================================
// Tax Settings
// =============================================================================

/// Which amount the GST rates are applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxMethod {
    /// Tax the original subtotal, before any discount.
    OnSubtotal,
    /// Tax the discounted subtotal.
    OnDiscountedSubtotal,
}

impl Default for TaxMethod {
    fn default() -> Self {
        TaxMethod::OnSubtotal
    }
}

/// The store's GST configuration.
///
/// Persisted as a singleton (the repository enforces get-or-create-default
/// semantics); the calculator receives it as a plain value so tests never
/// need database state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxSettings {
    /// Central GST rate in basis points.
    pub cgst_rate_bps: u32,

    /// State GST rate in basis points.
    pub sgst_rate_bps: u32,

    /// Which base the rates apply to.
    pub method: TaxMethod,
}

impl TaxSettings {
    /// Returns the CGST rate.
    #[inline]
    pub fn cgst_rate(&self) -> Rate {
        Rate::from_bps(self.cgst_rate_bps)
    }

    /// Returns the SGST rate.
    #[inline]
    pub fn sgst_rate(&self) -> Rate {
        Rate::from_bps(self.sgst_rate_bps)
    }
}

impl Default for TaxSettings {
    /// The common 2.5% + 2.5% restaurant GST split, taxed on the subtotal.
    fn default() -> Self {
        TaxSettings {
            cgst_rate_bps: crate::DEFAULT_CGST_BPS,
            sgst_rate_bps: crate::DEFAULT_SGST_BPS,
            method: TaxMethod::OnSubtotal,
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The lifecycle status of a café order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, not yet picked up by the kitchen.
    Pending,
    /// Kitchen is working on it.
    Preparing,
    /// Ready for pickup/serving.
    Ready,
    /// Served and settled.
    Completed,
    /// Cancelled before completion.
    Cancelled,
}

impl OrderStatus {
    /// Whether a transition from `self` to `next` is allowed.
    ///
    /// ```text
    /// Pending ──► Preparing ──► Ready ──► Completed
    ///    │            │
    ///    └────────────┴──► Cancelled
    /// ```
    /// Completed and Cancelled are terminal.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Preparing)
                | (Pending, Cancelled)
                | (Preparing, Ready)
                | (Preparing, Cancelled)
                | (Ready, Completed)
        )
    }

    /// Whether the status is terminal.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// A placed order with its persisted billing breakdown.
///
/// The breakdown fields are frozen at placement time: changing tax settings
/// or offers later never rewrites a past order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub status: OrderStatus,
    pub customer_name: Option<String>,
    pub subtotal_paise: i64,
    /// Manual discount amount at placement.
    pub discount_paise: i64,
    /// Offer discount amount at placement.
    pub offer_discount_paise: i64,
    /// Offer that was applied, if any (frozen id + name).
    pub applied_offer_id: Option<String>,
    pub applied_offer_name: Option<String>,
    pub discounted_subtotal_paise: i64,
    pub cgst_rate_bps: u32,
    pub sgst_rate_bps: u32,
    pub cgst_paise: i64,
    pub sgst_paise: i64,
    pub total_paise: i64,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in a placed order.
/// Uses the snapshot pattern to freeze menu data at ordering time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: String,
    /// Item name at ordering time (frozen).
    pub name_snapshot: String,
    /// Category at ordering time (frozen).
    pub category_snapshot: String,
    /// Unit price in paise at ordering time (frozen).
    pub unit_price_paise: i64,
    pub quantity: i64,
    /// Line total before discounts and tax (unit price × quantity).
    pub line_total_paise: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_paise(self.line_total_paise)
    }

    /// The line as the billing calculator's input shape.
    pub fn as_line_item(&self) -> LineItem {
        LineItem {
            item_id: self.menu_item_id.clone(),
            category: self.category_snapshot.clone(),
            quantity: self.quantity,
            unit_price_paise: self.unit_price_paise,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn offer_for_window(start: DateTime<Utc>, end: DateTime<Utc>) -> DailyOffer {
        DailyOffer {
            id: "offer-1".to_string(),
            name: "Test Offer".to_string(),
            description: None,
            offer_type: OfferType::Percentage,
            discount_value: 1000,
            min_order_paise: 0,
            max_discount_paise: None,
            applicable_categories: Vec::new(),
            applicable_items: Vec::new(),
            start_date: start,
            end_date: end,
            applicable_days: Vec::new(),
            is_active: true,
            priority: 0,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_rate_conversions() {
        let rate = Rate::from_bps(250);
        assert_eq!(rate.bps(), 250);
        assert!((rate.percentage() - 2.5).abs() < 0.001);
        assert_eq!(Rate::from_percentage(2.5), rate);
    }

    #[test]
    fn test_offer_window_bounds_are_inclusive() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 31, 23, 59, 59).unwrap();
        let offer = offer_for_window(start, end);

        assert!(offer.is_valid_at(start));
        assert!(offer.is_valid_at(end));
        assert!(!offer.is_valid_at(end + Duration::milliseconds(1)));
        assert!(!offer.is_valid_at(start - Duration::milliseconds(1)));
    }

    #[test]
    fn test_offer_weekday_filter() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 31, 23, 59, 59).unwrap();
        let mut offer = offer_for_window(start, end);
        // 2026-03-02 is a Monday; 1 = Monday in the 0 = Sunday convention.
        offer.applicable_days = vec![1];

        let monday = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let tuesday = Utc.with_ymd_and_hms(2026, 3, 3, 12, 0, 0).unwrap();
        assert!(offer.is_valid_at(monday));
        assert!(!offer.is_valid_at(tuesday));
    }

    #[test]
    fn test_offer_kill_switch() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 31, 0, 0, 0).unwrap();
        let mut offer = offer_for_window(start, end);
        offer.is_active = false;
        assert!(!offer.is_valid_at(start + Duration::days(1)));
    }

    #[test]
    fn test_scoping_is_inclusive_or() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 31, 0, 0, 0).unwrap();
        let mut offer = offer_for_window(start, end);
        offer.applicable_categories = vec!["beverages".to_string()];
        offer.applicable_items = vec!["item-42".to_string()];

        let category_match = vec![LineItem {
            item_id: "item-1".to_string(),
            category: "beverages".to_string(),
            quantity: 1,
            unit_price_paise: 1000,
        }];
        let item_match = vec![LineItem {
            item_id: "item-42".to_string(),
            category: "desserts".to_string(),
            quantity: 1,
            unit_price_paise: 1000,
        }];
        let no_match = vec![LineItem {
            item_id: "item-7".to_string(),
            category: "desserts".to_string(),
            quantity: 1,
            unit_price_paise: 1000,
        }];

        assert!(offer.matches_items(&category_match));
        assert!(offer.matches_items(&item_match));
        assert!(!offer.matches_items(&no_match));
    }

    #[test]
    fn test_unscoped_offer_matches_everything() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 31, 0, 0, 0).unwrap();
        let offer = offer_for_window(start, end);
        assert!(offer.matches_items(&[]));
    }

    #[test]
    fn test_order_status_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Preparing));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Preparing.can_transition_to(Ready));
        assert!(Preparing.can_transition_to(Cancelled));
        assert!(Ready.can_transition_to(Completed));

        assert!(!Ready.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Preparing));
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
    }

    #[test]
    fn test_tax_settings_default() {
        let settings = TaxSettings::default();
        assert_eq!(settings.cgst_rate_bps, 250);
        assert_eq!(settings.sgst_rate_bps, 250);
        assert_eq!(settings.method, TaxMethod::OnSubtotal);
    }

    #[test]
    fn test_line_item_total() {
        let line = LineItem {
            item_id: "item-1".to_string(),
            category: "beverages".to_string(),
            quantity: 3,
            unit_price_paise: 12000,
        };
        assert_eq!(line.line_total().paise(), 36000);
    }
}
