//! Listings of the independent cinemas of Paris (CIP), crawled from the
//! `cip-paris.fr` movie pages and published as one static HTML page.
//!
//! Pipeline: [`crawl`] walks the listing pages through [`listing`], the
//! records are stored as a JSON artifact ([`model`]), then [`render`] reads
//! the artifact back, applies the date [`window`], builds the [`grouping`]
//! views and [`html`] writes the page, which [`upload`] publishes.

pub mod config;
pub mod crawl;
pub mod error;
pub mod grouping;
pub mod html;
pub mod listing;
pub mod model;
pub mod render;
pub mod showtime;
pub mod upload;
pub mod window;

pub use error::{Error, Result};
pub use model::{Cinema, ListingRecord, Movie, Showtime};
