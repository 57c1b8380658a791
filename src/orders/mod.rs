//! Order payload reshaping.
//!
//! The gateway never exposes raw Admin API order objects. Upstream orders are
//! deserialized into the narrow [`UpstreamOrder`] shape (serde drops every
//! field we do not name) and projected into [`OrderView`], the one canonical
//! representation callers see. Anything Shopify adds to its payloads in the
//! future stays invisible until it is mapped here explicitly.

pub mod presentation;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The slice of an upstream Shopify order the gateway maps.
///
/// Deserialization intentionally names only the projected fields; unknown
/// fields are discarded, which is what keeps upstream-internal data from
/// leaking through the gateway.
#[derive(Clone, Debug, Deserialize)]
pub struct UpstreamOrder {
    /// Numeric order id.
    pub id: u64,
    /// Sequential order number within the shop.
    pub order_number: Option<u64>,
    /// Display name, e.g. `#1001`.
    pub name: Option<String>,
    /// Checkout email.
    pub email: Option<String>,
    /// When the order was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the order was processed (falls back to `created_at` in the view).
    pub processed_at: Option<DateTime<Utc>>,
    /// ISO currency code.
    pub currency: Option<String>,
    /// Pre-tax, pre-shipping subtotal.
    pub subtotal_price: Option<String>,
    /// Total tax.
    pub total_tax: Option<String>,
    /// Total discounts.
    pub total_discounts: Option<String>,
    /// Grand total.
    pub total_price: Option<String>,
    /// Payment status (`pending`, `paid`, ...).
    pub financial_status: Option<String>,
    /// Fulfillment status; `null` upstream means nothing shipped yet.
    pub fulfillment_status: Option<String>,
    /// Line items.
    #[serde(default)]
    pub line_items: Vec<UpstreamLineItem>,
    /// Customer, when the order has one.
    pub customer: Option<UpstreamCustomer>,
    /// Shipping address.
    pub shipping_address: Option<UpstreamAddress>,
    /// Billing address.
    pub billing_address: Option<UpstreamAddress>,
    /// Order-level tax lines.
    #[serde(default)]
    pub tax_lines: Vec<UpstreamTaxLine>,
    /// Discount codes entered at checkout.
    #[serde(default)]
    pub discount_codes: Vec<UpstreamDiscountCode>,
}

/// Upstream line item subset.
#[derive(Clone, Debug, Deserialize)]
pub struct UpstreamLineItem {
    /// Line item id.
    pub id: Option<u64>,
    /// Product title.
    pub title: Option<String>,
    /// Variant title, when the product has variants.
    pub variant_title: Option<String>,
    /// Stock keeping unit.
    pub sku: Option<String>,
    /// Quantity ordered.
    #[serde(default)]
    pub quantity: u32,
    /// Unit price as a decimal string.
    pub price: Option<String>,
}

/// Upstream customer subset.
#[derive(Clone, Debug, Deserialize)]
pub struct UpstreamCustomer {
    /// Customer id.
    pub id: Option<u64>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

/// Upstream address subset (shared by shipping and billing).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct UpstreamAddress {
    /// Recipient name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Street address, first line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    /// Street address, second line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    /// City.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Province or state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    /// Country.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Postal code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Upstream tax line subset.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct UpstreamTaxLine {
    /// Tax name, e.g. `VAT`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Rate as a fraction, e.g. `0.2`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    /// Amount as a decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

/// Upstream discount code subset.
#[derive(Clone, Debug, Deserialize)]
pub struct UpstreamDiscountCode {
    /// The code entered at checkout.
    pub code: Option<String>,
    /// Discounted amount as a decimal string.
    pub amount: Option<String>,
    /// Discount type, e.g. `percentage` or `fixed_amount`.
    #[serde(rename = "type")]
    pub discount_type: Option<String>,
}

/// Monetary totals of an order.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct OrderTotals {
    /// Pre-tax, pre-shipping subtotal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<String>,
    /// Total tax.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<String>,
    /// Total discounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounts: Option<String>,
    /// Grand total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
}

/// Customer summary in the view.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CustomerView {
    /// Customer id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Full name, assembled from first and last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Line item in the view, with the computed per-line total.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct LineItemView {
    /// Line item id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Product title, with variant title appended when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Stock keeping unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Quantity ordered.
    pub quantity: u32,
    /// Unit price as a decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<String>,
    /// `unit_price * quantity`, rounded to two decimal places.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_total: Option<String>,
}

/// Discount code in the view.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DiscountCodeView {
    /// The code entered at checkout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Discounted amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// Discount type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// The reshaped order representation returned to API callers.
///
/// A strict subset/relabeling of the upstream order. Derived, never
/// persisted.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct OrderView {
    /// Numeric order id.
    pub id: u64,
    /// Sequential order number within the shop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    /// Display name, e.g. `#1001`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// When the order was placed (`processed_at`, falling back to
    /// `created_at`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placed_at: Option<DateTime<Utc>>,
    /// ISO currency code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Payment status; `pending` when upstream omits it.
    pub financial_status: String,
    /// Fulfillment status; `unfulfilled` when upstream reports none.
    pub fulfillment_status: String,
    /// Monetary totals.
    pub totals: OrderTotals,
    /// Customer summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerView>,
    /// Line items with computed per-line totals.
    pub line_items: Vec<LineItemView>,
    /// Shipping address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<UpstreamAddress>,
    /// Billing address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<UpstreamAddress>,
    /// Order-level tax lines.
    pub tax_lines: Vec<UpstreamTaxLine>,
    /// Discount codes entered at checkout.
    pub discount_codes: Vec<DiscountCodeView>,
}

impl From<UpstreamOrder> for OrderView {
    fn from(order: UpstreamOrder) -> Self {
        let customer = order.customer.map(|c| CustomerView {
            id: c.id,
            name: full_name(c.first_name.as_deref(), c.last_name.as_deref()),
            email: c.email.or_else(|| order.email.clone()),
        });

        let line_items = order.line_items.into_iter().map(LineItemView::from).collect();

        let discount_codes = order
            .discount_codes
            .into_iter()
            .map(|d| DiscountCodeView {
                code: d.code,
                amount: d.amount,
                kind: d.discount_type,
            })
            .collect();

        Self {
            id: order.id,
            number: order.order_number,
            name: order.name,
            placed_at: order.processed_at.or(order.created_at),
            currency: order.currency,
            financial_status: order
                .financial_status
                .unwrap_or_else(|| "pending".to_string()),
            fulfillment_status: order
                .fulfillment_status
                .unwrap_or_else(|| "unfulfilled".to_string()),
            totals: OrderTotals {
                subtotal: order.subtotal_price,
                tax: order.total_tax,
                discounts: order.total_discounts,
                total: order.total_price,
            },
            customer,
            line_items,
            shipping_address: order.shipping_address,
            billing_address: order.billing_address,
            tax_lines: order.tax_lines,
            discount_codes,
        }
    }
}

impl From<UpstreamLineItem> for LineItemView {
    fn from(item: UpstreamLineItem) -> Self {
        let title = match (item.title, item.variant_title) {
            (Some(title), Some(variant)) => Some(format!("{title} - {variant}")),
            (Some(title), None) => Some(title),
            (None, variant) => variant,
        };
        let line_total = line_total(item.price.as_deref(), item.quantity);

        Self {
            id: item.id,
            title,
            sku: item.sku,
            quantity: item.quantity,
            unit_price: item.price,
            line_total,
        }
    }
}

/// Computes `unit_price * quantity` to two decimal places.
///
/// Returns `None` when the price is absent or not a decimal: a garbage
/// upstream price should not take the whole order listing down.
fn line_total(price: Option<&str>, quantity: u32) -> Option<String> {
    let unit = Decimal::from_str(price?).ok()?;
    let total = unit * Decimal::from(quantity);
    Some(total.round_dp(2).to_string())
}

fn full_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    match (first, last) {
        (Some(f), Some(l)) => Some(format!("{f} {l}")),
        (Some(f), None) => Some(f.to_string()),
        (None, Some(l)) => Some(l.to_string()),
        (None, None) => None,
    }
}
