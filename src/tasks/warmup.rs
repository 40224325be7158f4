//! Cache Warmup Task
//!
//! Background pass that walks every listing page, every product and every
//! category listing so later reads hit the cache.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::catalog::CatalogClient;
use crate::config::{
    Config, DEFAULT_PAGE_CONCURRENCY, DEFAULT_PAGE_SIZE, DEFAULT_PRODUCT_CONCURRENCY,
    DEFAULT_WARMUP_MAX_PAGES,
};

// == Options ==
/// Page size and concurrency limits for a warmup pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmupOptions {
    /// Products per listing page
    pub page_size: u32,
    /// Listing pages in flight at once
    pub page_concurrency: usize,
    /// Product detail requests in flight at once
    pub product_concurrency: usize,
    /// Pages walked per listing, whatever total the upstream reports
    pub max_pages: u32,
}

impl WarmupOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_size: config.page_size.max(1),
            page_concurrency: config.page_concurrency.max(1),
            product_concurrency: config.product_concurrency.max(1),
            max_pages: config.warmup_max_pages.max(1),
        }
    }
}

impl Default for WarmupOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_concurrency: DEFAULT_PAGE_CONCURRENCY,
            product_concurrency: DEFAULT_PRODUCT_CONCURRENCY,
            max_pages: DEFAULT_WARMUP_MAX_PAGES,
        }
    }
}

// == Report ==
/// What a warmup pass fetched and what failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarmupReport {
    /// Whether the category list was fetched
    pub categories_listed: bool,
    /// Number of categories walked
    pub categories: usize,
    /// Categories whose first page could not be fetched
    pub categories_failed: usize,
    /// Listing pages fetched (unfiltered and per category)
    pub pages_cached: usize,
    /// Listing pages that failed
    pub pages_failed: usize,
    /// Product detail records fetched
    pub products_cached: usize,
    /// Product detail records that failed
    pub products_failed: usize,
    /// Batches issued (pages and products)
    pub batches: usize,
}

// == Batched Execution ==
/// Runs `op` over `items`, starting at most `limit` operations together and
/// waiting for the whole batch to settle before starting the next.
///
/// Items are pulled one batch at a time. Returns the results in item order
/// and the number of batches issued.
pub async fn run_batched<I, T, F, Fut>(
    items: impl IntoIterator<Item = I>,
    limit: usize,
    mut op: F,
) -> (Vec<T>, usize)
where
    F: FnMut(I) -> Fut,
    Fut: Future<Output = T>,
{
    let limit = limit.max(1);
    let mut results = Vec::new();
    let mut batches = 0;

    let mut items = items.into_iter().peekable();
    while items.peek().is_some() {
        let batch: Vec<Fut> = items.by_ref().take(limit).map(&mut op).collect();
        results.extend(join_all(batch).await);
        batches += 1;
    }

    (results, batches)
}

// == Warmup Pass ==
/// Runs one best-effort warmup pass.
///
/// Individual failures are logged and counted; they never stop the pass.
pub async fn run_warmup(client: &CatalogClient, options: &WarmupOptions) -> WarmupReport {
    let mut report = WarmupReport::default();
    info!("Starting cache warmup");

    match client.list_categories().await {
        Ok(categories) => {
            report.categories_listed = true;
            info!(count = categories.len(), "Categories cached");
        }
        Err(err) => warn!(error = %err, "Failed to cache categories"),
    }

    if let Some(product_ids) = warm_listing(client, None, options, &mut report).await {
        let (results, batches) =
            run_batched(product_ids, options.product_concurrency, |id| async move {
                let result = client.get_product(&id).await;
                (id, result)
            })
            .await;
        report.batches += batches;

        for (id, result) in results {
            match result {
                Ok(_) => report.products_cached += 1,
                Err(err) => {
                    report.products_failed += 1;
                    warn!(product_id = %id, error = %err, "Failed to cache product");
                }
            }
        }
        info!(count = report.products_cached, "Product details cached");
    }

    match client.list_categories().await {
        Ok(categories) => {
            info!(count = categories.len(), "Caching category listings");
            for category in &categories {
                report.categories += 1;
                if warm_listing(client, Some(&category.name), options, &mut report)
                    .await
                    .is_none()
                {
                    report.categories_failed += 1;
                }
            }
        }
        Err(err) => warn!(error = %err, "Failed to cache category filters"),
    }

    info!(
        pages = report.pages_cached,
        products = report.products_cached,
        categories = report.categories,
        failures = report.pages_failed + report.products_failed + report.categories_failed,
        "Cache warmup completed"
    );
    report
}

/// Fetches page 1 of a listing to learn its size, then every page in
/// batches. Returns the distinct product ids seen, in first-seen order, or
/// `None` if page 1 could not be fetched.
async fn warm_listing(
    client: &CatalogClient,
    category: Option<&str>,
    options: &WarmupOptions,
    report: &mut WarmupReport,
) -> Option<Vec<String>> {
    let page_size = options.page_size;
    let label = category.unwrap_or("all");

    let first = match client.list_products(category, Some(1), Some(page_size)).await {
        Ok(first) => first,
        Err(err) => {
            report.pages_failed += 1;
            warn!(listing = label, error = %err, "Failed to fetch first listing page");
            return None;
        }
    };

    let reported_pages = first.total_pages(page_size);
    debug!(listing = label, total = first.total, total_pages = reported_pages, "Listing size");
    if reported_pages == 0 {
        return Some(Vec::new());
    }

    let max_pages = options.max_pages.max(1);
    let total_pages = if reported_pages > max_pages {
        warn!(
            listing = label,
            total = first.total,
            reported_pages,
            max_pages,
            "Listing exceeds warmup page cap, truncating"
        );
        max_pages
    } else {
        reported_pages
    };

    let pages = 1..=total_pages;
    let (results, batches) = run_batched(pages, options.page_concurrency, |page| async move {
        let result = client.list_products(category, Some(page), Some(page_size)).await;
        (page, result)
    })
    .await;
    report.batches += batches;

    let mut seen = HashSet::new();
    let mut product_ids = Vec::new();
    for (page, result) in results {
        match result {
            Ok(listing) => {
                report.pages_cached += 1;
                for product in listing.data {
                    if seen.insert(product.product_id.clone()) {
                        product_ids.push(product.product_id);
                    }
                }
            }
            Err(err) => {
                report.pages_failed += 1;
                warn!(listing = label, page, error = %err, "Failed to cache page");
            }
        }
    }

    info!(listing = label, pages = total_pages, "Listing pages cached");
    Some(product_ids)
}

// == Background Task ==
/// Spawns a warmup pass that starts after `delay`.
///
/// Fire-and-forget: the report is only logged. The handle can be used to
/// abort the pass during shutdown.
///
/// # Example
/// ```ignore
/// let client = CatalogClient::from_config(&config)?;
/// let handle = spawn_warmup_task(client, WarmupOptions::default(), Duration::from_secs(2));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_warmup_task(
    client: CatalogClient,
    options: WarmupOptions,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!(delay_ms = delay.as_millis() as u64, "Cache warmup scheduled");
        tokio::time::sleep(delay).await;

        let report = run_warmup(&client, &options).await;
        let entries = client.cache().len().await;
        info!(?report, entries, "Cache warmup finished");
    })
}
