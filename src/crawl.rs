use crate::error::Result;
use crate::listing::{ListingExtractor, ListingPage};
use crate::model::ListingRecord;
use reqwest::{Client, header};
use std::collections::{HashSet, VecDeque};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

/// Anything that can hand back the markup behind a URL.
#[async_trait::async_trait]
pub trait PageSource {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new() -> Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.text().await?)
    }
}

/// A fetched page and what was extracted from it.
#[derive(Debug, Clone)]
pub struct CrawledPage {
    pub url: String,
    pub page: ListingPage,
}

/// Pull-based walk over the listing pages.
///
/// Each start URL is followed through its whole pagination chain before the
/// next start URL is touched, so pages come out in traversal order.
pub struct ListingCrawl<'a, S: PageSource + ?Sized> {
    source: &'a S,
    extractor: &'a ListingExtractor,
    pending: VecDeque<String>,
    visited: HashSet<String>,
}

impl<'a, S: PageSource + ?Sized> ListingCrawl<'a, S> {
    pub fn new(source: &'a S, extractor: &'a ListingExtractor, start_urls: &[String]) -> Self {
        Self {
            source,
            extractor,
            pending: start_urls.iter().cloned().collect(),
            visited: HashSet::new(),
        }
    }

    /// Fetch and extract the next page, or `None` once every chain ended.
    pub async fn next_page(&mut self) -> Result<Option<CrawledPage>> {
        while let Some(url) = self.pending.pop_front() {
            if !self.visited.insert(url.clone()) {
                tracing::debug!(%url, "already visited");
                continue;
            }

            let html = self.source.fetch_page(&url).await?;
            let page = self.extractor.extract(&html, &url)?;
            tracing::info!(
                %url,
                records = page.records.len(),
                skipped = page.skipped,
                next = ?page.next_page,
                "listing page extracted"
            );
            if let Some(next) = &page.next_page {
                self.pending.push_front(next.clone());
            }
            return Ok(Some(CrawledPage { url, page }));
        }
        Ok(None)
    }
}

/// Run a crawl to the end and collect every record in page order.
pub async fn crawl_all<S: PageSource + ?Sized>(
    source: &S,
    extractor: &ListingExtractor,
    start_urls: &[String],
) -> Result<Vec<ListingRecord>> {
    let mut crawl = ListingCrawl::new(source, extractor, start_urls);
    let mut records = Vec::new();
    let mut pages = 0usize;
    let mut skipped = 0usize;
    while let Some(crawled) = crawl.next_page().await? {
        pages += 1;
        skipped += crawled.page.skipped;
        records.extend(crawled.page.records);
    }
    tracing::info!(pages, records = records.len(), skipped, "crawl finished");
    Ok(records)
}
