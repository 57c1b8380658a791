//! Locale-selectable presentation of order responses.
//!
//! Response envelope key names and financial-status labels are deployment
//! configuration. Every locale is a projection over the same canonical
//! [`OrderView`]; the locale never forks the data model.

use crate::config::{OrdersLocale, ShopDomain};
use crate::orders::OrderView;
use serde_json::{Map, Value};

/// Envelope key names for one locale.
struct EnvelopeKeys {
    ok: &'static str,
    shop: &'static str,
    count: &'static str,
    orders: &'static str,
    order: &'static str,
}

const EN: EnvelopeKeys = EnvelopeKeys {
    ok: "ok",
    shop: "shop",
    count: "count",
    orders: "orders",
    order: "order",
};

const ES: EnvelopeKeys = EnvelopeKeys {
    ok: "exito",
    shop: "tienda",
    count: "cantidad",
    orders: "pedidos",
    order: "pedido",
};

const fn keys(locale: OrdersLocale) -> &'static EnvelopeKeys {
    match locale {
        OrdersLocale::En => &EN,
        OrdersLocale::Es => &ES,
    }
}

/// Returns the localized label for a financial status value.
///
/// Unknown statuses pass through untouched so a new upstream value degrades
/// to English rather than an error.
#[must_use]
pub fn financial_status_label(status: &str, locale: OrdersLocale) -> String {
    if locale == OrdersLocale::En {
        return status.to_string();
    }
    match status {
        "pending" => "pendiente",
        "authorized" => "autorizado",
        "partially_paid" => "parcialmente_pagado",
        "paid" => "pagado",
        "partially_refunded" => "parcialmente_reembolsado",
        "refunded" => "reembolsado",
        "voided" => "anulado",
        other => other,
    }
    .to_string()
}

/// Serializes one view, applying locale-specific value labels.
fn localized_view(view: &OrderView, locale: OrdersLocale) -> Value {
    let mut value = serde_json::to_value(view).unwrap_or_default();
    if let Some(status) = value.get("financial_status").and_then(Value::as_str) {
        let label = financial_status_label(status, locale);
        value["financial_status"] = Value::String(label);
    }
    value
}

/// Builds the response envelope for the orders list.
#[must_use]
pub fn orders_list(locale: OrdersLocale, shop: &ShopDomain, views: &[OrderView]) -> Value {
    let keys = keys(locale);
    let orders: Vec<Value> = views.iter().map(|v| localized_view(v, locale)).collect();

    let mut envelope = Map::new();
    envelope.insert(keys.ok.to_string(), Value::Bool(true));
    envelope.insert(keys.shop.to_string(), Value::String(shop.as_ref().to_string()));
    envelope.insert(keys.count.to_string(), Value::from(orders.len()));
    envelope.insert(keys.orders.to_string(), Value::Array(orders));
    Value::Object(envelope)
}

/// Builds the response envelope for a single order.
#[must_use]
pub fn single_order(locale: OrdersLocale, shop: &ShopDomain, view: &OrderView) -> Value {
    let keys = keys(locale);

    let mut envelope = Map::new();
    envelope.insert(keys.ok.to_string(), Value::Bool(true));
    envelope.insert(keys.shop.to_string(), Value::String(shop.as_ref().to_string()));
    envelope.insert(keys.order.to_string(), localized_view(view, locale));
    Value::Object(envelope)
}
