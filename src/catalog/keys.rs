//! Request key derivation.
//!
//! A request key is the fully resolved request URL. Keys are built with
//! [`url::Url`] so identical arguments always produce byte-identical keys.
//!
//! Listing keys always carry `_page` and `_limit`, so "all products" and
//! "page 1" share one cache entry.

use url::Url;

use crate::error::{CatalogError, Result};

/// Builds request URLs for the catalog API.
#[derive(Debug, Clone)]
pub struct RequestKeys {
    base: Url,
}

impl RequestKeys {
    /// Parses the API base URL, e.g. `http://localhost:3001` or
    /// `https://shop.example/api/`.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(CatalogError::Config(format!(
                "API base URL cannot carry paths: {}",
                base_url
            )));
        }
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self { base })
    }

    pub fn base(&self) -> &str {
        self.base.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // == Products ==
    /// `GET {base}/products?category=<c>&_page=<n>&_limit=<m>`
    ///
    /// `category` is omitted when absent or empty.
    pub fn products(&self, category: Option<&str>, page: u32, limit: u32) -> String {
        let mut url = self.endpoint(&["products"]);
        {
            let mut query = url.query_pairs_mut();
            if let Some(category) = category.filter(|c| !c.is_empty()) {
                query.append_pair("category", category);
            }
            query.append_pair("_page", &page.to_string());
            query.append_pair("_limit", &limit.to_string());
        }
        url.into()
    }

    // == Product ==
    /// `GET {base}/products/{id}` with the id encoded as one path segment.
    pub fn product(&self, product_id: &str) -> String {
        self.endpoint(&["products", product_id]).into()
    }

    // == Categories ==
    /// `GET {base}/categories`
    pub fn categories(&self) -> String {
        self.endpoint(&["categories"]).into()
    }
}
