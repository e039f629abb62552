//! Date-window pruning of a movie list.

use crate::model::Movie;
use chrono::{Days, NaiveDate};

/// Last day of the window `[reference, reference + horizon_days]`.
pub fn window_end(reference: NaiveDate, horizon_days: u32) -> NaiveDate {
    reference
        .checked_add_days(Days::new(u64::from(horizon_days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Drop showtimes outside the window, then cinemas and movies left empty.
/// Remaining elements keep their relative order.
pub fn retain_window(movies: &mut Vec<Movie>, reference: NaiveDate, horizon_days: u32) {
    let end = window_end(reference, horizon_days);
    movies.retain_mut(|movie| {
        movie.cinemas.retain_mut(|cinema| {
            cinema
                .show_times
                .retain(|st| (reference..=end).contains(&st.date()));
            !cinema.show_times.is_empty()
        });
        !movie.cinemas.is_empty()
    });
}

pub fn filter_window(
    mut movies: Vec<Movie>,
    reference: NaiveDate,
    horizon_days: u32,
) -> Vec<Movie> {
    retain_window(&mut movies, reference, horizon_days);
    movies
}
