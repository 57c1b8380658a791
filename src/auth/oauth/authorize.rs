//! OAuth authorization URL generation.
//!
//! The first step in the flow: build the URL on the shop's admin that asks
//! the merchant to grant the gateway its requested scopes, carrying the
//! nonce as the `state` parameter.

use crate::auth::oauth::Nonce;
use crate::auth::AuthScopes;
use crate::config::{ApiKey, HostUrl, ShopDomain};

/// Path on the gateway that receives the OAuth callback.
pub const CALLBACK_PATH: &str = "/auth/callback";

/// Builds the authorization URL for `shop`.
///
/// The URL points at `https://<shop>/admin/oauth/authorize` with `client_id`,
/// `scope`, `redirect_uri` (the gateway's public host plus
/// [`CALLBACK_PATH`]), and `state` set to the nonce. Keys and values are both
/// URL-encoded.
///
/// # Example
///
/// ```rust
/// use order_gateway::auth::oauth::{authorize_url, Nonce};
/// use order_gateway::{ApiKey, HostUrl, ShopDomain};
///
/// let shop = ShopDomain::new("test-shop").unwrap();
/// let api_key = ApiKey::new("api-key").unwrap();
/// let host = HostUrl::new("https://gateway.example.com").unwrap();
/// let nonce = Nonce::new();
///
/// let url = authorize_url(
///     &shop,
///     &api_key,
///     &"read_orders".parse().unwrap(),
///     &host,
///     &nonce,
/// );
/// assert!(url.starts_with("https://test-shop.myshopify.com/admin/oauth/authorize?"));
/// assert!(url.contains("state="));
/// ```
#[must_use]
pub fn authorize_url(
    shop: &ShopDomain,
    api_key: &ApiKey,
    scopes: &AuthScopes,
    host: &HostUrl,
    nonce: &Nonce,
) -> String {
    let redirect_uri = format!("{}{CALLBACK_PATH}", host.as_ref());

    let params = [
        ("client_id", api_key.as_ref().to_string()),
        ("scope", scopes.to_string()),
        ("redirect_uri", redirect_uri),
        ("state", nonce.as_ref().to_string()),
    ];

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "https://{}/admin/oauth/authorize?{}",
        shop.as_ref(),
        query_string
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> (ShopDomain, ApiKey, AuthScopes, HostUrl) {
        (
            ShopDomain::new("test-shop").unwrap(),
            ApiKey::new("test-api-key").unwrap(),
            "read_orders".parse().unwrap(),
            HostUrl::new("https://gateway.example.com").unwrap(),
        )
    }

    #[test]
    fn test_authorize_url_structure() {
        let (shop, api_key, scopes, host) = fixtures();
        let nonce = Nonce::new();

        let url = authorize_url(&shop, &api_key, &scopes, &host, &nonce);

        assert!(url.starts_with("https://test-shop.myshopify.com/admin/oauth/authorize?"));
    }

    #[test]
    fn test_authorize_url_includes_all_required_params() {
        let (shop, api_key, scopes, host) = fixtures();
        let nonce = Nonce::new();

        let url = authorize_url(&shop, &api_key, &scopes, &host, &nonce);

        assert!(url.contains("client_id=test-api-key"));
        assert!(url.contains("scope=read_orders"));
        assert!(url.contains("redirect_uri="));
        assert!(url.contains(&format!("state={}", nonce.as_ref())));
    }

    #[test]
    fn test_authorize_url_encodes_redirect_uri() {
        let (shop, api_key, scopes, host) = fixtures();
        let nonce = Nonce::new();

        let url = authorize_url(&shop, &api_key, &scopes, &host, &nonce);

        let expected = urlencoding::encode("https://gateway.example.com/auth/callback");
        assert!(url.contains(&format!("redirect_uri={expected}")));
    }

    #[test]
    fn test_authorize_url_varies_by_shop() {
        let (_, api_key, scopes, host) = fixtures();
        let nonce = Nonce::new();

        let one = authorize_url(
            &ShopDomain::new("shop-one").unwrap(),
            &api_key,
            &scopes,
            &host,
            &nonce,
        );
        let two = authorize_url(
            &ShopDomain::new("shop-two").unwrap(),
            &api_key,
            &scopes,
            &host,
            &nonce,
        );

        assert!(one.contains("shop-one.myshopify.com"));
        assert!(two.contains("shop-two.myshopify.com"));
    }
}
