//! # Order Billing Calculator
//!
//! The one place where a bill is priced: offer resolution, discount
//! application, GST computation, breakdown assembly.
//!
//! ## Computation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     calculate_billing                               │
//! │                                                                     │
//! │  subtotal, items, options          tax settings, offer (injected)   │
//! │        │                                  │                         │
//! │        ▼                                  ▼                         │
//! │  1. evaluate_offer ──► Applied(amount) | NotApplicable(reason)      │
//! │  2. manual discount (stacks independently of the offer)             │
//! │  3. discounted_subtotal = max(0, subtotal − manual − offer)         │
//! │  4. tax base = subtotal | discounted_subtotal  (per TaxMethod)      │
//! │  5. cgst = base × cgst_rate,  sgst = base × sgst_rate               │
//! │  6. total = discounted_subtotal + cgst + sgst                       │
//! │        │                                                            │
//! │        ▼                                                            │
//! │  BillingBreakdown (every intermediate amount reported)              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Purity
//! No I/O, no clock, no randomness. Tax settings, the candidate offer,
//! and the evaluation instant are all injected, so the function is
//! referentially transparent: same inputs, byte-identical breakdown.
//! The host layer performs the two repository reads and passes the
//! snapshots in.
//!
//! ## Silent-degrade policy
//! A missing or non-applicable offer is NOT an error: the bill is still
//! priced, with a zero offer contribution. [`evaluate_offer`] exposes the
//! typed reason so callers that care (admin preview, tests) can see why
//! an offer was skipped, while the breakdown itself stays best-effort.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{DailyOffer, LineItem, OfferType, Rate, TaxMethod, TaxSettings};

// =============================================================================
// Input Types
// =============================================================================

/// A manual discount keyed in by the cashier, independent of any offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ManualDiscount {
    /// Percentage of the subtotal.
    Percentage(Rate),
    /// Absolute amount in paise.
    Fixed(Money),
}

/// Optional billing inputs beyond subtotal and items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillingOptions {
    /// Manual discount, if the cashier applied one.
    pub discount: Option<ManualDiscount>,
}

// =============================================================================
// Offer Evaluation
// =============================================================================

/// Why a candidate offer did not contribute to the bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OfferSkipReason {
    /// Kill-switch is off.
    Inactive,
    /// Outside the start/end validity window.
    OutsideWindow,
    /// Valid window, but not one of the offer's weekdays.
    WrongWeekday,
    /// Subtotal below the offer's minimum order amount.
    BelowMinimum,
    /// Neither scoping list matched any order line.
    NoScopeMatch,
}

/// The outcome of evaluating one pre-selected offer against a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OfferApplication {
    /// The offer applies; `amount` is its discount contribution.
    Applied { amount: Money },
    /// The offer does not apply; the bill proceeds without it.
    NotApplicable { reason: OfferSkipReason },
}

impl OfferApplication {
    /// The discount contribution (zero when not applicable).
    pub fn amount(&self) -> Money {
        match self {
            OfferApplication::Applied { amount } => *amount,
            OfferApplication::NotApplicable { .. } => Money::zero(),
        }
    }
}

/// Evaluates a single pre-selected offer against a bill.
///
/// Check order mirrors the validity/eligibility/applicability split on
/// [`DailyOffer`]: kill-switch, window, weekday, minimum order, scoping.
/// The first failing check is the reported reason.
///
/// For percentage offers the discount is `subtotal × rate`, clamped to
/// `max_discount` when configured. For fixed offers it is the configured
/// amount as-is: deliberately NOT clamped to the subtotal here (only the
/// combined discounted subtotal is floored at zero, in
/// [`calculate_billing`]). Whether a large fixed offer should instead cap
/// at the subtotal is an open business question; this keeps the source
/// behavior.
pub fn evaluate_offer(
    offer: &DailyOffer,
    subtotal: Money,
    items: &[LineItem],
    at: DateTime<Utc>,
) -> OfferApplication {
    use OfferSkipReason::*;

    if !offer.is_active {
        return OfferApplication::NotApplicable { reason: Inactive };
    }
    if at < offer.start_date || at > offer.end_date {
        return OfferApplication::NotApplicable {
            reason: OutsideWindow,
        };
    }
    // is_valid_at folds the weekday check in; it is re-split here so the
    // skip reason distinguishes "expired" from "wrong day".
    if !offer.is_valid_at(at) {
        return OfferApplication::NotApplicable {
            reason: WrongWeekday,
        };
    }
    if subtotal < Money::from_paise(offer.min_order_paise) {
        return OfferApplication::NotApplicable {
            reason: BelowMinimum,
        };
    }
    if !offer.matches_items(items) {
        return OfferApplication::NotApplicable {
            reason: NoScopeMatch,
        };
    }

    let amount = match offer.offer_type {
        OfferType::Percentage => {
            let raw = subtotal.apply_rate(offer.percentage_rate());
            match offer.max_discount() {
                Some(cap) => raw.min(cap),
                None => raw,
            }
        }
        OfferType::Fixed => offer.fixed_amount(),
    };

    OfferApplication::Applied { amount }
}

// =============================================================================
// Billing Breakdown
// =============================================================================

/// Minimal summary of the applied offer, embedded in the breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OfferSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl From<&DailyOffer> for OfferSummary {
    fn from(offer: &DailyOffer) -> Self {
        OfferSummary {
            id: offer.id.clone(),
            name: offer.name.clone(),
            description: offer.description.clone(),
        }
    }
}

/// A fully reconciled price breakdown for one bill.
///
/// Ephemeral: constructed fresh per call, never persisted by the
/// calculator. Callers decide whether to store it alongside an order.
///
/// ## Internal Consistency
/// `total == discounted_subtotal + cgst_amount + sgst_amount`, exactly -
/// integer paise make the reconciliation identity hold with no rounding
/// slack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillingBreakdown {
    /// Caller-supplied sum of line totals, echoed back.
    pub subtotal: Money,

    /// The manual discount that was requested, echoed back.
    pub discount: Option<ManualDiscount>,

    /// Amount the manual discount removed.
    pub discount_amount: Money,

    /// The offer that contributed, if any.
    pub applied_offer: Option<OfferSummary>,

    /// Amount the offer removed (zero when no offer applied).
    pub offer_discount_amount: Money,

    /// `max(0, subtotal − discount_amount − offer_discount_amount)`.
    pub discounted_subtotal: Money,

    pub cgst_rate: Rate,
    pub sgst_rate: Rate,
    pub cgst_amount: Money,
    pub sgst_amount: Money,

    /// `cgst_amount + sgst_amount`.
    pub tax: Money,

    /// `discounted_subtotal + tax`.
    pub total: Money,
}

// =============================================================================
// The Calculator
// =============================================================================

/// Produces the full billing breakdown for one bill.
///
/// ## Arguments
/// * `subtotal` - caller-computed sum of line totals; never re-derived here
/// * `items` - used ONLY for offer scoping checks
/// * `options` - manual discount, if any
/// * `settings` - tax settings snapshot (injected, not a global)
/// * `offer` - the pre-selected candidate offer, if the caller resolved one;
///   `None` covers both "no offer requested" and "offer id not found"
/// * `at` - evaluation instant for the offer validity window
///
/// ## Guarantees
/// * `discounted_subtotal >= 0` even when the combined discounts exceed
///   the subtotal
/// * `total == discounted_subtotal + cgst_amount + sgst_amount` exactly
/// * deterministic: identical inputs produce an identical breakdown
///
/// ## Example
/// ```rust
/// use cafe_core::billing::{calculate_billing, BillingOptions};
/// use cafe_core::money::Money;
/// use cafe_core::types::TaxSettings;
/// use chrono::Utc;
///
/// let breakdown = calculate_billing(
///     Money::from_paise(100_000), // ₹1000.00
///     &[],
///     &BillingOptions::default(),
///     &TaxSettings::default(), // 2.5% + 2.5% on subtotal
///     None,
///     Utc::now(),
/// );
/// assert_eq!(breakdown.total.paise(), 105_000); // ₹1050.00
/// ```
pub fn calculate_billing(
    subtotal: Money,
    items: &[LineItem],
    options: &BillingOptions,
    settings: &TaxSettings,
    offer: Option<&DailyOffer>,
    at: DateTime<Utc>,
) -> BillingBreakdown {
    // 1. Offer contribution (best-effort: non-application is not an error).
    let (applied_offer, offer_discount_amount) = match offer {
        Some(candidate) => match evaluate_offer(candidate, subtotal, items, at) {
            OfferApplication::Applied { amount } => (Some(OfferSummary::from(candidate)), amount),
            OfferApplication::NotApplicable { .. } => (None, Money::zero()),
        },
        None => (None, Money::zero()),
    };

    // 2. Manual discount, stacking independently of the offer.
    let discount_amount = match options.discount {
        Some(ManualDiscount::Percentage(rate)) => subtotal.apply_rate(rate),
        Some(ManualDiscount::Fixed(amount)) => amount,
        None => Money::zero(),
    };

    // 3. Floor the COMBINED result at zero; the individual discounts are
    // not clamped to the subtotal first.
    let discounted_subtotal =
        (subtotal - discount_amount - offer_discount_amount).max(Money::zero());

    // 4-5. GST on the configured base.
    let tax_base = match settings.method {
        TaxMethod::OnSubtotal => subtotal,
        TaxMethod::OnDiscountedSubtotal => discounted_subtotal,
    };
    let cgst_amount = tax_base.apply_rate(settings.cgst_rate());
    let sgst_amount = tax_base.apply_rate(settings.sgst_rate());
    let tax = cgst_amount + sgst_amount;

    // 6. Reconciled total.
    let total = discounted_subtotal + tax;

    BillingBreakdown {
        subtotal,
        discount: options.discount,
        discount_amount,
        applied_offer,
        offer_discount_amount,
        discounted_subtotal,
        cgst_rate: settings.cgst_rate(),
        sgst_rate: settings.sgst_rate(),
        cgst_amount,
        sgst_amount,
        tax,
        total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaxMethod;
    use chrono::{Duration, TimeZone};

    fn gst_5_split() -> TaxSettings {
        TaxSettings {
            cgst_rate_bps: 250,
            sgst_rate_bps: 250,
            method: TaxMethod::OnSubtotal,
        }
    }

    fn beverage_line() -> LineItem {
        LineItem {
            item_id: "item-cappuccino".to_string(),
            category: "beverages".to_string(),
            quantity: 2,
            unit_price_paise: 25000,
        }
    }

    fn open_offer(offer_type: OfferType, discount_value: i64) -> DailyOffer {
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap();
        DailyOffer {
            id: "offer-1".to_string(),
            name: "House Offer".to_string(),
            description: Some("Test offer".to_string()),
            offer_type,
            discount_value,
            min_order_paise: 0,
            max_discount_paise: None,
            applicable_categories: Vec::new(),
            applicable_items: Vec::new(),
            start_date: now - Duration::days(7),
            end_date: now + Duration::days(7),
            applicable_days: Vec::new(),
            is_active: true,
            priority: 0,
            created_at: now - Duration::days(7),
            updated_at: now - Duration::days(7),
        }
    }

    fn eval_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn plain_bill_taxes_the_subtotal() {
        // ₹1000, no discount, no offer, 2.5% + 2.5% on subtotal.
        let b = calculate_billing(
            Money::from_paise(100_000),
            &[],
            &BillingOptions::default(),
            &gst_5_split(),
            None,
            eval_instant(),
        );
        assert_eq!(b.cgst_amount.paise(), 2500);
        assert_eq!(b.sgst_amount.paise(), 2500);
        assert_eq!(b.tax.paise(), 5000);
        assert_eq!(b.total.paise(), 105_000);
    }

    #[test]
    fn percentage_discount_with_tax_on_subtotal() {
        // ₹1000, 10% manual discount, tax still computed on the original
        // subtotal: ₹900 + ₹50 = ₹950.
        let options = BillingOptions {
            discount: Some(ManualDiscount::Percentage(Rate::from_bps(1000))),
        };
        let b = calculate_billing(
            Money::from_paise(100_000),
            &[],
            &options,
            &gst_5_split(),
            None,
            eval_instant(),
        );
        assert_eq!(b.discount_amount.paise(), 10_000);
        assert_eq!(b.discounted_subtotal.paise(), 90_000);
        assert_eq!(b.tax.paise(), 5000);
        assert_eq!(b.total.paise(), 95_000);
    }

    #[test]
    fn percentage_discount_with_tax_on_discounted_subtotal() {
        // Same bill, method flipped: tax base drops to ₹900 → ₹945 total.
        let options = BillingOptions {
            discount: Some(ManualDiscount::Percentage(Rate::from_bps(1000))),
        };
        let mut settings = gst_5_split();
        settings.method = TaxMethod::OnDiscountedSubtotal;
        let b = calculate_billing(
            Money::from_paise(100_000),
            &[],
            &options,
            &settings,
            None,
            eval_instant(),
        );
        assert_eq!(b.discounted_subtotal.paise(), 90_000);
        assert_eq!(b.cgst_amount.paise(), 2250);
        assert_eq!(b.sgst_amount.paise(), 2250);
        assert_eq!(b.total.paise(), 94_500);
    }

    #[test]
    fn percentage_offer_clamps_to_max_discount() {
        // ₹500 order, 20% offer capped at ₹50, minimum ₹100:
        // raw ₹100 → clamped ₹50 → discounted subtotal ₹450.
        let mut offer = open_offer(OfferType::Percentage, 2000);
        offer.min_order_paise = 10_000;
        offer.max_discount_paise = Some(5000);

        let b = calculate_billing(
            Money::from_paise(50_000),
            &[beverage_line()],
            &BillingOptions::default(),
            &gst_5_split(),
            Some(&offer),
            eval_instant(),
        );
        assert_eq!(b.offer_discount_amount.paise(), 5000);
        assert_eq!(b.discounted_subtotal.paise(), 45_000);
        assert!(b.applied_offer.is_some());
        assert_eq!(b.total, b.discounted_subtotal + b.cgst_amount + b.sgst_amount);
    }

    #[test]
    fn offer_below_minimum_degrades_silently() {
        // ₹50 order against a ₹100 minimum: offer contributes nothing,
        // no error raised.
        let mut offer = open_offer(OfferType::Percentage, 2000);
        offer.min_order_paise = 10_000;

        let subtotal = Money::from_paise(5000);
        let application = evaluate_offer(&offer, subtotal, &[beverage_line()], eval_instant());
        assert_eq!(
            application,
            OfferApplication::NotApplicable {
                reason: OfferSkipReason::BelowMinimum
            }
        );

        let b = calculate_billing(
            subtotal,
            &[beverage_line()],
            &BillingOptions::default(),
            &gst_5_split(),
            Some(&offer),
            eval_instant(),
        );
        assert_eq!(b.offer_discount_amount, Money::zero());
        assert!(b.applied_offer.is_none());
    }

    #[test]
    fn oversized_fixed_discount_floors_at_zero() {
        // ₹1000 bill, ₹1500 fixed discount: discounted subtotal floors at
        // zero but tax is still charged on the original subtotal when the
        // method says so.
        let options = BillingOptions {
            discount: Some(ManualDiscount::Fixed(Money::from_paise(150_000))),
        };
        let b = calculate_billing(
            Money::from_paise(100_000),
            &[],
            &options,
            &gst_5_split(),
            None,
            eval_instant(),
        );
        assert_eq!(b.discount_amount.paise(), 150_000);
        assert_eq!(b.discounted_subtotal, Money::zero());
        assert_eq!(b.tax.paise(), 5000);
        assert_eq!(b.total.paise(), 5000);

        let mut settings = gst_5_split();
        settings.method = TaxMethod::OnDiscountedSubtotal;
        let b = calculate_billing(
            Money::from_paise(100_000),
            &[],
            &options,
            &settings,
            None,
            eval_instant(),
        );
        assert_eq!(b.total, Money::zero());
    }

    #[test]
    fn fixed_offer_and_fixed_discount_stack_unclamped() {
        // Neither fixed amount is individually capped at the subtotal;
        // only the combined result is floored. Known sharp edge.
        let offer = open_offer(OfferType::Fixed, 80_000);
        let options = BillingOptions {
            discount: Some(ManualDiscount::Fixed(Money::from_paise(80_000))),
        };
        let b = calculate_billing(
            Money::from_paise(100_000),
            &[beverage_line()],
            &options,
            &gst_5_split(),
            Some(&offer),
            eval_instant(),
        );
        assert_eq!(b.discount_amount.paise(), 80_000);
        assert_eq!(b.offer_discount_amount.paise(), 80_000);
        assert_eq!(b.discounted_subtotal, Money::zero());
    }

    #[test]
    fn zero_subtotal_bills_zero() {
        let options = BillingOptions {
            discount: Some(ManualDiscount::Percentage(Rate::from_bps(5000))),
        };
        for method in [TaxMethod::OnSubtotal, TaxMethod::OnDiscountedSubtotal] {
            let mut settings = gst_5_split();
            settings.method = method;
            let b = calculate_billing(
                Money::zero(),
                &[],
                &options,
                &settings,
                Some(&open_offer(OfferType::Percentage, 2000)),
                eval_instant(),
            );
            assert_eq!(b.total, Money::zero());
        }
    }

    #[test]
    fn end_date_boundary_is_inclusive() {
        let mut offer = open_offer(OfferType::Percentage, 1000);
        offer.end_date = eval_instant();

        let at_boundary = evaluate_offer(
            &offer,
            Money::from_paise(100_000),
            &[beverage_line()],
            eval_instant(),
        );
        assert!(matches!(at_boundary, OfferApplication::Applied { .. }));

        let past_boundary = evaluate_offer(
            &offer,
            Money::from_paise(100_000),
            &[beverage_line()],
            eval_instant() + Duration::milliseconds(1),
        );
        assert_eq!(
            past_boundary,
            OfferApplication::NotApplicable {
                reason: OfferSkipReason::OutsideWindow
            }
        );
    }

    #[test]
    fn mixed_scoping_applies_on_either_list() {
        // Scoped to a category AND an unrelated item id: a line matching
        // either one is enough (inclusive OR, not AND).
        let mut offer = open_offer(OfferType::Percentage, 1000);
        offer.applicable_categories = vec!["desserts".to_string()];
        offer.applicable_items = vec!["item-cappuccino".to_string()];

        // beverage_line matches by item id only.
        let by_item = evaluate_offer(
            &offer,
            Money::from_paise(50_000),
            &[beverage_line()],
            eval_instant(),
        );
        assert!(matches!(by_item, OfferApplication::Applied { .. }));

        let dessert = LineItem {
            item_id: "item-brownie".to_string(),
            category: "desserts".to_string(),
            quantity: 1,
            unit_price_paise: 18000,
        };
        let by_category = evaluate_offer(
            &offer,
            Money::from_paise(50_000),
            &[dessert],
            eval_instant(),
        );
        assert!(matches!(by_category, OfferApplication::Applied { .. }));

        let unrelated = LineItem {
            item_id: "item-mug".to_string(),
            category: "merchandise".to_string(),
            quantity: 1,
            unit_price_paise: 30000,
        };
        let miss = evaluate_offer(
            &offer,
            Money::from_paise(50_000),
            &[unrelated],
            eval_instant(),
        );
        assert_eq!(
            miss,
            OfferApplication::NotApplicable {
                reason: OfferSkipReason::NoScopeMatch
            }
        );
    }

    #[test]
    fn skip_reasons_are_reported_in_check_order() {
        let mut offer = open_offer(OfferType::Percentage, 1000);
        offer.is_active = false;
        let r = evaluate_offer(&offer, Money::from_paise(1000), &[], eval_instant());
        assert_eq!(
            r,
            OfferApplication::NotApplicable {
                reason: OfferSkipReason::Inactive
            }
        );

        let mut offer = open_offer(OfferType::Percentage, 1000);
        // Valid window but restricted to a different weekday than the
        // evaluation instant (2026-06-15 is a Monday).
        offer.applicable_days = vec![0];
        let r = evaluate_offer(&offer, Money::from_paise(1000), &[], eval_instant());
        assert_eq!(
            r,
            OfferApplication::NotApplicable {
                reason: OfferSkipReason::WrongWeekday
            }
        );
    }

    #[test]
    fn manual_discount_and_offer_stack() {
        // ₹1000, 10% manual + flat ₹100 offer → discounted subtotal ₹800.
        let offer = open_offer(OfferType::Fixed, 10_000);
        let options = BillingOptions {
            discount: Some(ManualDiscount::Percentage(Rate::from_bps(1000))),
        };
        let b = calculate_billing(
            Money::from_paise(100_000),
            &[beverage_line()],
            &options,
            &gst_5_split(),
            Some(&offer),
            eval_instant(),
        );
        assert_eq!(b.discount_amount.paise(), 10_000);
        assert_eq!(b.offer_discount_amount.paise(), 10_000);
        assert_eq!(b.discounted_subtotal.paise(), 80_000);
        assert_eq!(b.total.paise(), 85_000);
    }

    #[test]
    fn breakdown_is_internally_consistent_and_deterministic() {
        let offer = open_offer(OfferType::Percentage, 1500);
        let options = BillingOptions {
            discount: Some(ManualDiscount::Fixed(Money::from_paise(3300))),
        };
        let mut settings = gst_5_split();
        settings.method = TaxMethod::OnDiscountedSubtotal;

        let first = calculate_billing(
            Money::from_paise(123_455),
            &[beverage_line()],
            &options,
            &settings,
            Some(&offer),
            eval_instant(),
        );
        let second = calculate_billing(
            Money::from_paise(123_455),
            &[beverage_line()],
            &options,
            &settings,
            Some(&offer),
            eval_instant(),
        );

        assert_eq!(first, second);
        assert_eq!(
            first.total,
            first.discounted_subtotal + first.cgst_amount + first.sgst_amount
        );
        assert_eq!(first.tax, first.cgst_amount + first.sgst_amount);
    }
}
