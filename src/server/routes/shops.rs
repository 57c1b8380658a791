//! Shop administration endpoints.
//!
//! - `GET /v1/shops` lists installed shops.
//! - `DELETE /v1/shops/{shop}` uninstalls one (drops its token).
//! - `GET /v1/shop?shop=` fetches shop metadata through the GraphQL Admin
//!   API, with the same token resolution and re-auth mapping as the orders
//!   endpoints.

use crate::config::ShopDomain;
use crate::server::error::ApiError;
use crate::server::routes::orders::{admin_client, resolve_shop};
use crate::server::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

/// GraphQL query for shop metadata.
const SHOP_INFO_QUERY: &str =
    "query { shop { name email currencyCode plan { displayName } } }";

/// Query parameters for `GET /v1/shop`.
#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    /// The shop to inspect. Required.
    pub shop: Option<String>,
}

/// `GET /v1/shops`: list installed shops.
pub async fn list_shops(State(state): State<AppState>) -> Json<Value> {
    let shops: Vec<Value> = state
        .store
        .list_records()
        .into_iter()
        .map(|(domain, record)| {
            json!({
                "domain": domain,
                "installedAt": record.installed_at.to_rfc3339(),
            })
        })
        .collect();

    Json(json!({
        "ok": true,
        "count": shops.len(),
        "shops": shops,
    }))
}

/// `DELETE /v1/shops/{shop}`: uninstall a shop.
pub async fn uninstall_shop(
    State(state): State<AppState>,
    Path(shop): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let shop = ShopDomain::new(shop)?;

    let existed = state.store.remove(&shop)?;
    if !existed {
        return Err(ApiError::NotFound(format!(
            "shop {} is not installed",
            shop.as_ref()
        )));
    }

    tracing::info!(shop = %shop, "shop uninstalled");
    Ok(Json(json!({
        "ok": true,
        "shop": shop.as_ref(),
    })))
}

/// `GET /v1/shop?shop=`: fetch shop metadata via GraphQL.
pub async fn shop_info(
    State(state): State<AppState>,
    Query(query): Query<ShopQuery>,
) -> Result<Json<Value>, ApiError> {
    let (shop, token) = resolve_shop(&state, query.shop)?;

    let client = admin_client(&state, &shop, token);
    let data = client
        .graphql(SHOP_INFO_QUERY, None)
        .await
        .map_err(|err| ApiError::from_upstream(err, state.config.auth_url_for(&shop), false))?;

    Ok(Json(json!({
        "ok": true,
        "shop": shop.as_ref(),
        "info": data.get("shop").cloned().unwrap_or(Value::Null),
    })))
}
