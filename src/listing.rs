//! Extraction of one CIP listing page (`/ajax-movies?page=N&category=C`).
//!
//! Page shape, as served by the site:
//! `.movie-results-container` per movie, with the poster and detail link in
//! `.clearfix` and the title in `.desc h3`. Each `.movie-sessions` block holds
//! `.cinemaTitle` headers paired by position with `.reservations-wrapper`
//! blocks, and each wrapper holds `.session-date` groups of one
//! `.sessionDate` plus one or more `.time` entries.

use crate::error::{Error, Result};
use crate::model::{Cinema, ListingRecord, Movie};
use crate::showtime::parse_show_time;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

/// Records found on one page, plus the link to the page after it.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub records: Vec<ListingRecord>,
    pub next_page: Option<String>,
    /// Showtimes dropped because their fragments did not parse.
    pub skipped: usize,
}

struct Selectors {
    container: Selector,
    title: Selector,
    link: Selector,
    poster: Selector,
    session: Selector,
    cinema_title: Selector,
    reservations: Selector,
    heading: Selector,
    anchor: Selector,
    session_date: Selector,
    day: Selector,
    time: Selector,
    pagination: Selector,
    next_link: Selector,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Selector(format!("{css}: {e}")))
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            container: selector(".movie-results-container")?,
            title: selector(".desc h3")?,
            link: selector(".clearfix > a[href]")?,
            poster: selector(".clearfix img[src]")?,
            session: selector(".movie-sessions")?,
            cinema_title: selector(".cinemaTitle")?,
            reservations: selector(".reservations-wrapper")?,
            heading: selector("h3")?,
            anchor: selector("a[href]")?,
            session_date: selector(".session-date")?,
            day: selector(".sessionDate")?,
            time: selector(".time")?,
            pagination: selector(".pagination")?,
            next_link: selector(".current + .page a[href]")?,
        })
    }
}

pub struct ListingExtractor {
    base_url: String,
    reference_year: i32,
    selectors: Selectors,
}

impl ListingExtractor {
    /// `reference_year` is applied to every showtime on every page this
    /// extractor sees.
    pub fn new(base_url: impl Into<String>, reference_year: i32) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            reference_year,
            selectors: Selectors::new()?,
        })
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Extract movies in document order and resolve the next-page link
    /// against `page_url`.
    pub fn extract(&self, html: &str, page_url: &str) -> Result<ListingPage> {
        let document = Html::parse_document(html);
        let mut page = ListingPage::default();

        for container in document.select(&self.selectors.container) {
            if let Some(movie) = self.movie(container, &mut page.skipped) {
                page.records.push(ListingRecord { movie });
            }
        }

        page.next_page = self.next_page(&document, page_url)?;
        Ok(page)
    }

    fn movie(&self, container: ElementRef<'_>, skipped: &mut usize) -> Option<Movie> {
        let s = &self.selectors;

        let title = container
            .select(&s.title)
            .next()
            .map(text_of)
            .filter(|t| !t.is_empty());
        let href = container
            .select(&s.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|h| !h.is_empty());
        let (title, href) = match (title, href) {
            (Some(t), Some(h)) => (t, h),
            (title, _) => {
                tracing::warn!(?title, "movie container without title or link, skipped");
                return None;
            }
        };

        let image_url = container
            .select(&s.poster)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::trim)
            .filter(|src| !src.is_empty())
            .map(|src| self.absolute(src))
            .unwrap_or_default();

        let mut cinemas = Vec::new();
        for session in container.select(&s.session) {
            let titles: Vec<ElementRef<'_>> = session.select(&s.cinema_title).collect();
            let wrappers: Vec<ElementRef<'_>> = session.select(&s.reservations).collect();
            if titles.len() != wrappers.len() {
                tracing::warn!(
                    movie = %title,
                    cinemas = titles.len(),
                    reservations = wrappers.len(),
                    "cinema/reservation count mismatch"
                );
            }
            for (header, wrapper) in titles.into_iter().zip(wrappers) {
                if let Some(cinema) = self.cinema(header, wrapper, &title, skipped) {
                    cinemas.push(cinema);
                }
            }
        }

        Some(Movie {
            title,
            url: self.absolute(href),
            image_url,
            cinemas,
        })
    }

    fn cinema(
        &self,
        header: ElementRef<'_>,
        wrapper: ElementRef<'_>,
        movie: &str,
        skipped: &mut usize,
    ) -> Option<Cinema> {
        let s = &self.selectors;

        let name = header
            .select(&s.heading)
            .next()
            .map(text_of)
            .filter(|n| !n.is_empty());
        let href = header
            .select(&s.anchor)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|h| !h.is_empty());
        let (name, href) = match (name, href) {
            (Some(n), Some(h)) => (n, h),
            (name, _) => {
                tracing::warn!(%movie, ?name, "cinema block without name or link, skipped");
                return None;
            }
        };

        let mut show_times = Vec::new();
        for group in wrapper.select(&s.session_date) {
            let day = group.select(&s.day).next().map(text_of).unwrap_or_default();
            for time in group.select(&s.time).map(text_of) {
                match parse_show_time(&day, &time, self.reference_year) {
                    Ok(st) => show_times.push(st),
                    Err(e) => {
                        *skipped += 1;
                        tracing::warn!(%movie, cinema = %name, %day, %time, error = %e, "showtime skipped");
                    }
                }
            }
        }

        Some(Cinema {
            name,
            url: self.absolute(href),
            show_times,
        })
    }

    fn next_page(&self, document: &Html, page_url: &str) -> Result<Option<String>> {
        let href = document
            .select(&self.selectors.pagination)
            .next()
            .and_then(|p| p.select(&self.selectors.next_link).next())
            .and_then(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|h| !h.is_empty());
        let Some(href) = href else {
            return Ok(None);
        };

        let base = Url::parse(page_url).map_err(|e| Error::Url(format!("{page_url}: {e}")))?;
        let next = base
            .join(href)
            .map_err(|e| Error::Url(format!("{href}: {e}")))?;
        Ok(Some(next.to_string()))
    }

    fn absolute(&self, href: &str) -> String {
        if href.starts_with("http") {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{}{}", self.base_url, href)
        } else {
            format!("{}/{}", self.base_url, href)
        }
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
