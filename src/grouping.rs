//! Display groupings over an already filtered movie list.
//!
//! Both views borrow from the movie list and never modify it.

use crate::model::{Cinema, Movie};
use chrono::NaiveDate;
use std::collections::HashMap;

/// A movie as it plays at one cinema entry.
#[derive(Debug, Clone, Copy)]
pub struct Screening<'a> {
    pub movie: &'a Movie,
    pub cinema: &'a Cinema,
}

#[derive(Debug, Clone)]
pub struct MoviesByCinema<'a> {
    /// First cinema entry seen with this name.
    pub cinema: &'a Cinema,
    pub movies: Vec<Screening<'a>>,
}

#[derive(Debug, Clone)]
pub struct MoviesByDay<'a> {
    pub day: NaiveDate,
    pub movies: Vec<&'a Movie>,
}

/// Groups by cinema name, in first-seen order. A movie with two entries of
/// the same cinema shows up twice in that group.
pub fn group_by_cinema(movies: &[Movie]) -> Vec<MoviesByCinema<'_>> {
    let mut groups: Vec<MoviesByCinema<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for movie in movies {
        for cinema in &movie.cinemas {
            let i = *index.entry(cinema.name.as_str()).or_insert_with(|| {
                groups.push(MoviesByCinema {
                    cinema,
                    movies: Vec::new(),
                });
                groups.len() - 1
            });
            groups[i].movies.push(Screening { movie, cinema });
        }
    }
    groups
}

/// Groups by showtime date, in first-seen order. A movie is listed at most
/// once per day.
pub fn group_by_day(movies: &[Movie]) -> Vec<MoviesByDay<'_>> {
    let mut groups: Vec<MoviesByDay<'_>> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for movie in movies {
        for cinema in &movie.cinemas {
            for st in &cinema.show_times {
                let i = *index.entry(st.date()).or_insert_with(|| {
                    groups.push(MoviesByDay {
                        day: st.date(),
                        movies: Vec::new(),
                    });
                    groups.len() - 1
                });
                let group = &mut groups[i];
                if !group.movies.iter().any(|m| std::ptr::eq(*m, movie)) {
                    group.movies.push(movie);
                }
            }
        }
    }
    groups
}
