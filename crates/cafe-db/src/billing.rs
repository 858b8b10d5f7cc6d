//! Billing service.
//!
//! Glue between the repositories and the pure calculator in
//! [`cafe_core::billing`]. The service owns the lookups (menu prices,
//! the pre-selected offer, the GST configuration) and hands everything
//! to [`calculate_billing`], which never touches the database.
//!
//! ## Offer Failure Policy
//! A missing or ineligible offer never fails a checkout. The lookup
//! miss (or the calculator's own eligibility rejection) degrades to a
//! zero offer contribution and the bill goes through without it. The
//! skip is logged at debug level for the till operator's benefit.

use cafe_core::billing::{calculate_billing, BillingBreakdown, BillingOptions, ManualDiscount};
use cafe_core::validation::{validate_order_size, validate_quantity};
use cafe_core::{CoreError, LineItem, Money, Order, OrderItem, OrderStatus};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::pool::Database;

/// How many times to regenerate a ticket number that lost an insert race.
const TICKET_RETRIES: usize = 3;

/// One requested line at the till: which item, how many.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub menu_item_id: String,
    pub quantity: i64,
}

/// Everything the till sends when pricing or placing an order.
#[derive(Debug, Clone, Default)]
pub struct BillingRequest {
    pub lines: Vec<OrderLine>,
    pub discount: Option<ManualDiscount>,
    pub applied_offer_id: Option<String>,
    pub customer_name: Option<String>,
    pub notes: Option<String>,
}

/// Service for pricing carts and placing orders.
#[derive(Debug, Clone)]
pub struct BillingService {
    db: Database,
}

impl BillingService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Price a cart without persisting anything.
    ///
    /// The till calls this on every cart change so the customer sees a
    /// live total.
    pub async fn preview(&self, request: &BillingRequest) -> DbResult<BillingBreakdown> {
        let (lines, _) = self.resolve_lines(request).await?;
        self.price(request, &lines).await
    }

    /// Price the cart, freeze the breakdown and persist the order.
    pub async fn place_order(&self, request: &BillingRequest) -> DbResult<(Order, Vec<OrderItem>)> {
        let (lines, snapshots) = self.resolve_lines(request).await?;
        if lines.is_empty() {
            return Err(CoreError::EmptyOrder.into());
        }

        let breakdown = self.price(request, &lines).await?;

        let now = Utc::now();
        let order_id = Uuid::new_v4().to_string();
        let order_number = self.db.orders().next_order_number(now).await?;

        let mut order = Order {
            id: order_id.clone(),
            order_number,
            status: OrderStatus::Pending,
            customer_name: request.customer_name.clone(),
            subtotal_paise: breakdown.subtotal.paise(),
            discount_paise: breakdown.discount_amount.paise(),
            offer_discount_paise: breakdown.offer_discount_amount.paise(),
            applied_offer_id: breakdown.applied_offer.as_ref().map(|o| o.id.clone()),
            applied_offer_name: breakdown.applied_offer.as_ref().map(|o| o.name.clone()),
            discounted_subtotal_paise: breakdown.discounted_subtotal.paise(),
            cgst_rate_bps: breakdown.cgst_rate.bps(),
            sgst_rate_bps: breakdown.sgst_rate.bps(),
            cgst_paise: breakdown.cgst_amount.paise(),
            sgst_paise: breakdown.sgst_amount.paise(),
            total_paise: breakdown.total.paise(),
            notes: request.notes.clone(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        };

        let items: Vec<OrderItem> = snapshots
            .into_iter()
            .map(|snap| OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                menu_item_id: snap.menu_item_id,
                name_snapshot: snap.name,
                category_snapshot: snap.category,
                unit_price_paise: snap.unit_price_paise,
                quantity: snap.quantity,
                line_total_paise: snap.unit_price_paise * snap.quantity,
                created_at: now,
            })
            .collect();

        // Two checkouts can read the same next ticket number; the loser
        // of the insert race regenerates and tries again.
        let mut collisions = 0;
        loop {
            match self.db.orders().insert(&order, &items).await {
                Ok(()) => break,
                Err(DbError::UniqueViolation { field, .. })
                    if field.contains("order_number") && collisions < TICKET_RETRIES =>
                {
                    collisions += 1;
                    order.order_number = self.db.orders().next_order_number(now).await?;
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            number = %order.order_number,
            total = %Money::from_paise(order.total_paise),
            offer = order.applied_offer_name.as_deref().unwrap_or("none"),
            "order placed"
        );

        Ok((order, items))
    }

    /// Run the calculator against the current settings and offer state.
    async fn price(
        &self,
        request: &BillingRequest,
        lines: &[LineItem],
    ) -> DbResult<BillingBreakdown> {
        let settings = self.db.tax_settings().get().await?;

        let offer = match &request.applied_offer_id {
            Some(id) => {
                let found = self.db.offers().get_by_id(id).await?;
                if found.is_none() {
                    debug!(offer_id = %id, "selected offer no longer exists, billing without it");
                }
                found
            }
            None => None,
        };

        let subtotal = lines
            .iter()
            .fold(Money::zero(), |acc, line| acc + line.line_total());

        let options = BillingOptions {
            discount: request.discount.clone(),
        };
        Ok(calculate_billing(
            subtotal,
            lines,
            &options,
            &settings,
            offer.as_ref(),
            Utc::now(),
        ))
    }

    /// Resolve requested lines against the live menu.
    ///
    /// Rejects unknown, retired and sold-out items outright; a till
    /// should never price something the kitchen cannot make.
    async fn resolve_lines(
        &self,
        request: &BillingRequest,
    ) -> DbResult<(Vec<LineItem>, Vec<LineSnapshot>)> {
        validate_order_size(request.lines.len()).map_err(CoreError::from)?;

        let menu = self.db.menu_items();
        let mut lines = Vec::with_capacity(request.lines.len());
        let mut snapshots = Vec::with_capacity(request.lines.len());

        for requested in &request.lines {
            validate_quantity(requested.quantity).map_err(CoreError::from)?;

            let item = menu
                .get_by_id(&requested.menu_item_id)
                .await?
                .ok_or_else(|| {
                    DbError::from(CoreError::MenuItemNotFound(requested.menu_item_id.clone()))
                })?;
            if !item.can_order() {
                return Err(CoreError::MenuItemUnavailable { id: item.id }.into());
            }

            lines.push(LineItem {
                item_id: item.id.clone(),
                category: item.category.clone(),
                quantity: requested.quantity,
                unit_price_paise: item.price_paise,
            });
            snapshots.push(LineSnapshot {
                menu_item_id: item.id,
                name: item.name,
                category: item.category,
                unit_price_paise: item.price_paise,
                quantity: requested.quantity,
            });
        }

        Ok((lines, snapshots))
    }
}

/// Menu state captured at pricing time, later frozen onto the order.
#[derive(Debug)]
struct LineSnapshot {
    menu_item_id: String,
    name: String,
    category: String,
    unit_price_paise: i64,
    quantity: i64,
}
