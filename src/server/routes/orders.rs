//! Orders endpoints: `GET /v1/orders` and `GET /v1/orders/{order_id}`.
//!
//! Both resolve the shop's token through the store, call the Admin REST API,
//! and project the payload through [`OrderView`] into the locale-configured
//! envelope. A shop without a token gets a 401 carrying the `auth_url` that
//! starts the OAuth flow.

use crate::clients::AdminClient;
use crate::config::{ShopDomain, ORDERS_LIMIT_RANGE};
use crate::orders::{presentation, OrderView, UpstreamOrder};
use crate::server::error::ApiError;
use crate::server::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

/// Query parameters for the orders endpoints.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    /// The shop to read from. Required.
    pub shop: Option<String>,
    /// Page size; clamped to Shopify's [1, 250] window.
    pub limit: Option<u32>,
    /// Order status filter; forwarded as given, defaults to `any`.
    pub status: Option<String>,
}

/// `GET /v1/orders`: list orders for a shop.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Value>, ApiError> {
    let (shop, token) = resolve_shop(&state, query.shop)?;

    let limit = query
        .limit
        .unwrap_or(state.config.orders().default_limit)
        .clamp(ORDERS_LIMIT_RANGE.0, ORDERS_LIMIT_RANGE.1);
    let status = query.status.unwrap_or_else(|| "any".to_string());

    let client = admin_client(&state, &shop, token);
    let body = client
        .rest(
            Method::GET,
            "orders.json",
            &[("limit", limit.to_string()), ("status", status)],
            None,
        )
        .await
        .map_err(|err| ApiError::from_upstream(err, state.config.auth_url_for(&shop), false))?;

    let views = parse_orders(&body)?;
    let locale = state.config.orders().locale;
    Ok(Json(presentation::orders_list(locale, &shop, &views)))
}

/// `GET /v1/orders/{order_id}`: fetch a single order.
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<u64>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Value>, ApiError> {
    let (shop, token) = resolve_shop(&state, query.shop)?;

    let client = admin_client(&state, &shop, token);
    let body = client
        .rest(Method::GET, &format!("orders/{order_id}.json"), &[], None)
        .await
        .map_err(|err| ApiError::from_upstream(err, state.config.auth_url_for(&shop), true))?;

    let order: UpstreamOrder = serde_json::from_value(body.get("order").cloned().unwrap_or(Value::Null))
        .map_err(|err| ApiError::Internal(format!("unexpected upstream order payload: {err}")))?;

    let locale = state.config.orders().locale;
    Ok(Json(presentation::single_order(
        locale,
        &shop,
        &OrderView::from(order),
    )))
}

/// Validates the `shop` parameter and resolves its access token.
///
/// Shared by every `/v1` endpoint that talks to a shop's Admin API.
pub fn resolve_shop(
    state: &AppState,
    shop: Option<String>,
) -> Result<(ShopDomain, String), ApiError> {
    let raw = shop
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::Validation("missing required parameter: shop".to_string()))?;
    let shop = ShopDomain::new(raw)?;

    match state.store.get(&shop) {
        Some(token) => Ok((shop, token)),
        None => Err(ApiError::Unauthorized {
            message: format!("shop {} is not authenticated", shop.as_ref()),
            auth_url: Some(state.config.auth_url_for(&shop)),
        }),
    }
}

/// Builds the Admin API client for one request.
pub fn admin_client(state: &AppState, shop: &ShopDomain, token: String) -> AdminClient {
    AdminClient::new(
        state.http.clone(),
        shop,
        token,
        state.config.api_version(),
        state.config.api_base(),
    )
}

fn parse_orders(body: &Value) -> Result<Vec<OrderView>, ApiError> {
    let raw = body.get("orders").cloned().unwrap_or(Value::Array(vec![]));
    let orders: Vec<UpstreamOrder> = serde_json::from_value(raw)
        .map_err(|err| ApiError::Internal(format!("unexpected upstream orders payload: {err}")))?;
    Ok(orders.into_iter().map(OrderView::from).collect())
}
