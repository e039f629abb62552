use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single screening start, local to the listing site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Showtime(NaiveDateTime);

impl Showtime {
    pub fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }
}

/// One cinema block of a movie listing. Identified by `name` when grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cinema {
    pub name: String,
    pub url: String,
    pub show_times: Vec<Showtime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub url: String,
    pub image_url: String,
    /// Same-named cinemas from different sessions stay separate entries.
    pub cinemas: Vec<Cinema>,
}

/// One record of the listing artifact: a movie as seen on one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub movie: Movie,
}

pub fn write_artifact(path: &Path, records: &[ListingRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a listing artifact and rehydrate its movies in record order.
pub fn read_artifact(path: &Path) -> Result<Vec<Movie>> {
    let body = std::fs::read_to_string(path)?;
    parse_artifact(&body)
}

pub fn parse_artifact(body: &str) -> Result<Vec<Movie>> {
    let records: Vec<ListingRecord> =
        serde_json::from_str(body).map_err(|e| Error::MalformedArtifact(e.to_string()))?;
    Ok(records.into_iter().map(|r| r.movie).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn showtime_serializes_as_local_iso_datetime() {
        let at = NaiveDate::from_ymd_opt(2022, 3, 11)
            .unwrap()
            .and_hms_opt(19, 30, 0)
            .unwrap();
        let json = serde_json::to_string(&Showtime::new(at)).unwrap();
        assert_eq!(json, "\"2022-03-11T19:30:00\"");
    }

    #[test]
    fn parses_artifact_records() {
        let body = r#"[
            {"movie": {"title": "Alouettes", "url": "http://cip-paris.fr/film/alouettes",
                       "image_url": "",
                       "cinemas": [{"name": "Reflet Médicis", "url": "http://cip-paris.fr/salle/reflet-medicis",
                                    "show_times": ["2022-03-11T19:30:00", "2022-03-12T14:00:00"]}]}}
        ]"#;
        let movies = parse_artifact(body).unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].cinemas[0].show_times.len(), 2);
        assert_eq!(
            movies[0].cinemas[0].show_times[1].date(),
            NaiveDate::from_ymd_opt(2022, 3, 12).unwrap()
        );
    }

    #[test]
    fn missing_field_is_malformed() {
        let body = r#"[{"movie": {"title": "No cinemas", "url": "x", "image_url": ""}}]"#;
        assert!(matches!(
            parse_artifact(body),
            Err(Error::MalformedArtifact(_))
        ));
    }

    #[test]
    fn bad_showtime_is_malformed() {
        let body = r#"[{"movie": {"title": "t", "url": "u", "image_url": "",
            "cinemas": [{"name": "n", "url": "u", "show_times": ["ven 11/03"]}]}}]"#;
        assert!(matches!(
            parse_artifact(body),
            Err(Error::MalformedArtifact(_))
        ));
    }
}
