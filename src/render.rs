use crate::error::Result;
use crate::grouping::{MoviesByCinema, MoviesByDay, group_by_cinema, group_by_day};
use crate::model::{Movie, read_artifact};
use crate::window::retain_window;
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::path::Path;

/// Filtered movies and the calendar they are displayed against.
#[derive(Debug, Clone)]
pub struct RenderData {
    pub movies: Vec<Movie>,
    pub day_range: Vec<NaiveDate>,
    pub generated_at: NaiveDateTime,
}

/// Everything the page writer needs, borrowed from a [`RenderData`].
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub movies: &'a [Movie],
    pub movies_by_cinema: Vec<MoviesByCinema<'a>>,
    pub movies_by_day: Vec<MoviesByDay<'a>>,
    pub day_range: &'a [NaiveDate],
    pub generated_at: NaiveDateTime,
}

impl RenderData {
    /// Load the artifact at `path` and keep what plays within
    /// `[reference, reference + max_days]`.
    pub fn assemble(path: &Path, reference: NaiveDate, max_days: u32) -> Result<Self> {
        let movies = read_artifact(path)?;
        Ok(Self::from_movies(movies, reference, max_days))
    }

    /// [`RenderData::assemble`] anchored on today's local date, read now.
    pub fn assemble_today(path: &Path, max_days: u32) -> Result<Self> {
        Self::assemble(path, Local::now().date_naive(), max_days)
    }

    pub fn from_movies(mut movies: Vec<Movie>, reference: NaiveDate, max_days: u32) -> Self {
        let loaded = movies.len();
        retain_window(&mut movies, reference, max_days);
        tracing::info!(%reference, max_days, loaded, kept = movies.len(), "movies filtered");
        Self {
            movies,
            day_range: day_range(reference, max_days),
            generated_at: Local::now().naive_local(),
        }
    }

    pub fn context(&self) -> RenderContext<'_> {
        RenderContext {
            movies: &self.movies,
            movies_by_cinema: group_by_cinema(&self.movies),
            movies_by_day: group_by_day(&self.movies),
            day_range: &self.day_range,
            generated_at: self.generated_at,
        }
    }
}

/// `horizon_days + 1` consecutive dates starting at `reference`.
pub fn day_range(reference: NaiveDate, horizon_days: u32) -> Vec<NaiveDate> {
    reference
        .iter_days()
        .take((horizon_days as usize).saturating_add(1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{ListingRecord, write_artifact};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 3, d).unwrap()
    }

    const ARTIFACT: &str = r#"[
      {"movie": {"title": "Alouettes", "url": "http://cip-paris.fr/film/alouettes", "image_url": "",
        "cinemas": [
          {"name": "Reflet Médicis", "url": "http://cip-paris.fr/salle/reflet-medicis",
           "show_times": ["2022-03-11T19:30:00", "2022-03-25T19:30:00"]},
          {"name": "Studio", "url": "http://cip-paris.fr/salle/studio",
           "show_times": ["2022-03-01T14:00:00"]}
        ]}},
      {"movie": {"title": "Belfast", "url": "http://cip-paris.fr/film/belfast", "image_url": "",
        "cinemas": [
          {"name": "Studio", "url": "http://cip-paris.fr/salle/studio",
           "show_times": ["2022-03-12T21:00:00"]}
        ]}}
    ]"#;

    #[test]
    fn day_range_has_horizon_plus_one_days() {
        assert_eq!(day_range(date(10), 0), vec![date(10)]);
        let range = day_range(date(10), 10);
        assert_eq!(range.len(), 11);
        assert_eq!(range.first(), Some(&date(10)));
        assert_eq!(range.last(), Some(&date(20)));
    }

    #[test]
    fn assembles_filtered_groupings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.json");
        std::fs::write(&path, ARTIFACT).unwrap();

        let data = RenderData::assemble(&path, date(10), 10).unwrap();
        assert_eq!(data.movies.len(), 2);
        assert_eq!(data.movies[0].cinemas.len(), 1);

        let ctx = data.context();
        let names: Vec<&str> = ctx
            .movies_by_cinema
            .iter()
            .map(|g| g.cinema.name.as_str())
            .collect();
        assert_eq!(names, vec!["Reflet Médicis", "Studio"]);
        let days: Vec<NaiveDate> = ctx.movies_by_day.iter().map(|g| g.day).collect();
        assert_eq!(days, vec![date(11), date(12)]);
        assert_eq!(ctx.day_range.len(), 11);
    }

    #[test]
    fn written_artifact_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.json");
        let movies = crate::model::parse_artifact(ARTIFACT).unwrap();
        let records: Vec<ListingRecord> = movies
            .iter()
            .cloned()
            .map(|movie| ListingRecord { movie })
            .collect();
        write_artifact(&path, &records).unwrap();

        let data = RenderData::assemble(&path, date(1), 30).unwrap();
        assert_eq!(data.movies, movies);
    }

    #[test]
    fn wrong_shape_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.json");
        std::fs::write(&path, r#"{"movie": []}"#).unwrap();
        assert!(matches!(
            RenderData::assemble(&path, date(1), 10),
            Err(Error::MalformedArtifact(_))
        ));
    }
}
