//! Browser `fetch` implementation of [`CatalogSource`].

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use shared::catalog::normalize_billboards;
use shared::{Billboard, BillboardFilter, BillboardRecord, CatalogError, CatalogSource, Clock, Region};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

#[derive(Debug, Clone)]
pub struct RestCatalog {
    base_url: String,
}

impl RestCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn regions_url(&self) -> String {
        listing_url(&self.base_url, "regions", &[], encode_component)
    }

    pub fn billboards_url(&self, filter: &BillboardFilter) -> String {
        listing_url(&self.base_url, "billboards", &filter.query_pairs(), encode_component)
    }
}

impl CatalogSource for RestCatalog {
    fn list_regions(&self) -> LocalBoxFuture<'static, Result<Vec<Region>, CatalogError>> {
        let url = self.regions_url();
        async move { get_json::<Vec<Region>>(&url).await }.boxed_local()
    }

    fn list_billboards(
        &self,
        filter: BillboardFilter,
    ) -> LocalBoxFuture<'static, Result<Vec<Billboard>, CatalogError>> {
        let url = self.billboards_url(&filter);
        async move {
            let records = get_json::<Vec<BillboardRecord>>(&url).await?;
            Ok(normalize_billboards(records))
        }
        .boxed_local()
    }
}

/// Milliseconds from `Date.now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

fn encode_component(value: &str) -> String {
    js_sys::encode_uri_component(value).into()
}

fn listing_url(
    base_url: &str,
    path: &str,
    pairs: &[(&'static str, String)],
    encode: impl Fn(&str) -> String,
) -> String {
    let mut url = format!("{base_url}/{path}");
    for (index, (name, value)) in pairs.iter().enumerate() {
        url.push(if index == 0 { '?' } else { '&' });
        url.push_str(name);
        url.push('=');
        url.push_str(&encode(value));
    }
    url
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, CatalogError> {
    let network_error = |error: wasm_bindgen::JsValue| CatalogError::Network(format!("{error:?}"));

    let window = web_sys::window().ok_or_else(|| CatalogError::Network("no window".to_string()))?;

    let init = RequestInit::new();
    init.set_method("GET");
    init.set_mode(RequestMode::Cors);
    let request = Request::new_with_str_and_init(url, &init).map_err(network_error)?;
    request
        .headers()
        .set("Accept", "application/json")
        .map_err(network_error)?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network_error)?
        .dyn_into()
        .map_err(network_error)?;

    if !response.ok() {
        return Err(CatalogError::Status {
            status: response.status(),
            url: url.to_string(),
        });
    }

    let body = JsFuture::from(response.text().map_err(network_error)?)
        .await
        .map_err(network_error)?
        .as_string()
        .unwrap_or_default();

    serde_json::from_str(&body).map_err(|error| CatalogError::Decode(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_spaces(value: &str) -> String {
        value.replace(' ', "%20")
    }

    #[test]
    fn regions_url_has_no_query() {
        assert_eq!(listing_url("/_api/catalog", "regions", &[], encode_spaces), "/_api/catalog/regions");
    }

    #[test]
    fn billboard_query_keeps_parameter_order() {
        let filter = BillboardFilter::from_input("r1", " av paulista ", 1000);
        let url = listing_url("/_api/catalog", "billboards", &filter.query_pairs(), encode_spaces);
        assert_eq!(url, "/_api/catalog/billboards?region_id=r1&search=av%20paulista&limit=1000");
    }

    #[test]
    fn unfiltered_listing_only_sends_the_limit() {
        let url = listing_url(
            "https://api.example.com",
            "billboards",
            &BillboardFilter::all(2000).query_pairs(),
            encode_spaces,
        );
        assert_eq!(url, "https://api.example.com/billboards?limit=2000");
    }
}
