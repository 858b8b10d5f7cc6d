//! # Validation Module
//!
//! Input validation for admin and ordering flows.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Validation Layers                             │
//! │                                                                     │
//! │  Layer 1: Admin frontend (TypeScript)                               │
//! │  ├── Basic format checks (empty, length)                            │
//! │  └── Immediate user feedback                                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE (Rust)                                        │
//! │  └── Business rule validation before anything touches the DB        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  └── NOT NULL / CHECK / foreign key constraints                     │
//! │                                                                     │
//! │  Defense in depth: multiple layers catch different errors.          │
//! │                                                                     │
//! │  NOTE: the billing calculator itself does NOT validate - it prices  │
//! │  already-validated inputs. Malformed numbers are stopped here, at   │
//! │  the edge.                                                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{DailyOffer, OfferType};
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a menu item or offer name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a menu category label.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Lowercase letters, digits and hyphens only - category labels double
///   as offer scoping keys and must compare exactly
pub fn validate_category(category: &str) -> ValidationResult<()> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if category.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: 50,
        });
    }

    if !category
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "category".to_string(),
            reason: "must contain only lowercase letters, digits, and hyphens".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in paise.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (complimentary items)
pub fn validate_price_paise(paise: i64) -> ValidationResult<()> {
    if paise < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a GST rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
/// - Realistic GST slabs are 0-1400 bps (0% to 14%) per component
pub fn validate_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates the number of lines in an order.
pub fn validate_order_size(line_count: usize) -> ValidationResult<()> {
    if line_count > MAX_ORDER_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "order items".to_string(),
            min: 0,
            max: MAX_ORDER_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Offer Validation
// =============================================================================

/// Validates a whole DailyOffer before it is stored.
///
/// ## Rules
/// - name non-empty
/// - discount_value >= 0; for percentage offers, at most 10000 bps (100%)
/// - min_order and max_discount non-negative
/// - start_date <= end_date
/// - every weekday in applicable_days within 0-6
pub fn validate_offer(offer: &DailyOffer) -> ValidationResult<()> {
    validate_name(&offer.name)?;

    if offer.discount_value < 0 {
        return Err(ValidationError::MustBePositive {
            field: "discount_value".to_string(),
        });
    }

    if offer.offer_type == OfferType::Percentage && offer.discount_value > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "discount_value".to_string(),
            min: 0,
            max: 10000,
        });
    }

    if offer.min_order_paise < 0 {
        return Err(ValidationError::OutOfRange {
            field: "min_order".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    if let Some(cap) = offer.max_discount_paise {
        if cap < 0 {
            return Err(ValidationError::OutOfRange {
                field: "max_discount".to_string(),
                min: 0,
                max: i64::MAX,
            });
        }
    }

    if offer.start_date > offer.end_date {
        return Err(ValidationError::InvalidFormat {
            field: "validity window".to_string(),
            reason: "start_date must not be after end_date".to_string(),
        });
    }

    if offer.applicable_days.iter().any(|&d| d > 6) {
        return Err(ValidationError::OutOfRange {
            field: "applicable_days".to_string(),
            min: 0,
            max: 6,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use cafe_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn sample_offer() -> DailyOffer {
        let now = Utc::now();
        DailyOffer {
            id: "offer-1".to_string(),
            name: "Weekend Special".to_string(),
            description: None,
            offer_type: OfferType::Percentage,
            discount_value: 1000,
            min_order_paise: 0,
            max_discount_paise: None,
            applicable_categories: Vec::new(),
            applicable_items: Vec::new(),
            start_date: now,
            end_date: now + Duration::days(30),
            applicable_days: vec![0, 6],
            is_active: true,
            priority: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Filter Coffee").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category("beverages").is_ok());
        assert!(validate_category("art-prints").is_ok());
        assert!(validate_category("").is_err());
        assert!(validate_category("Has Space").is_err());
        assert!(validate_category("UPPER").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_paise() {
        assert!(validate_price_paise(0).is_ok());
        assert!(validate_price_paise(14900).is_ok());
        assert!(validate_price_paise(-100).is_err());
    }

    #[test]
    fn test_validate_rate_bps() {
        assert!(validate_rate_bps(0).is_ok());
        assert!(validate_rate_bps(250).is_ok());
        assert!(validate_rate_bps(10000).is_ok());
        assert!(validate_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_offer_accepts_well_formed() {
        assert!(validate_offer(&sample_offer()).is_ok());
    }

    #[test]
    fn test_validate_offer_rejects_bad_percentage() {
        let mut offer = sample_offer();
        offer.discount_value = 12000; // 120%
        assert!(validate_offer(&offer).is_err());

        // A fixed offer may exceed 10000 (it is paise, not bps).
        offer.offer_type = OfferType::Fixed;
        assert!(validate_offer(&offer).is_ok());
    }

    #[test]
    fn test_validate_offer_rejects_inverted_window() {
        let mut offer = sample_offer();
        std::mem::swap(&mut offer.start_date, &mut offer.end_date);
        assert!(validate_offer(&offer).is_err());
    }

    #[test]
    fn test_validate_offer_rejects_bad_weekday() {
        let mut offer = sample_offer();
        offer.applicable_days = vec![7];
        assert!(validate_offer(&offer).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
