//! Static page writer for the assembled listings.

use crate::grouping::MoviesByCinema;
use crate::model::Showtime;
use crate::render::RenderContext;
use chrono::NaiveDate;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::collections::HashSet;
use std::fmt::Write;

static FR_WEEKDAY: [&str; 7] = ["lun", "mar", "mer", "jeu", "ven", "sam", "dim"];

/// `HH:MM` of a showtime.
pub fn format_show_time(st: &Showtime) -> String {
    st.datetime().format("%H:%M").to_string()
}

/// One bucket per day of `day_range`, in order. Showtimes on other days are
/// left out.
pub fn show_times_by_day<'a>(
    show_times: &'a [Showtime],
    day_range: &[NaiveDate],
) -> Vec<Vec<&'a Showtime>> {
    day_range
        .iter()
        .map(|day| show_times.iter().filter(|st| st.date() == *day).collect())
        .collect()
}

/// Anchor id for a cinema name.
pub fn cinema_slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>()
}

/// One unique anchor id per cinema group, in group order. Names that slug
/// to the same id get a `_2`, `_3`, ... suffix.
pub fn cinema_anchors(groups: &[MoviesByCinema<'_>]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    groups
        .iter()
        .map(|group| {
            let slug = cinema_slug(&group.cinema.name);
            let mut id = slug.clone();
            let mut n = 1;
            while !used.insert(id.clone()) {
                n += 1;
                id = format!("{slug}_{n}");
            }
            id
        })
        .collect()
}

fn day_label(day: &NaiveDate) -> String {
    use chrono::Datelike;
    let wd = day.weekday().num_days_from_monday() as usize;
    let name = FR_WEEKDAY.get(wd).copied().unwrap_or("");
    format!("{} {:02}/{:02}", name, day.day(), day.month())
}

pub fn render_page(ctx: &RenderContext<'_>) -> String {
    // Writing into a String cannot fail.
    let mut html = String::new();
    let _ = write_page(&mut html, ctx);
    html
}

fn write_page(out: &mut String, ctx: &RenderContext<'_>) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"fr\">")?;
    writeln!(
        out,
        "<head><meta charset=\"utf-8\"><title>Cinémas indépendants de Paris</title></head>"
    )?;
    writeln!(out, "<body>")?;

    let anchors = cinema_anchors(&ctx.movies_by_cinema);

    writeln!(out, "<nav>")?;
    for (group, id) in ctx.movies_by_cinema.iter().zip(&anchors) {
        writeln!(out, "<a href=\"#{}\">{}</a>", attr(id), text(&group.cinema.name))?;
    }
    writeln!(out, "</nav>")?;

    for (group, id) in ctx.movies_by_cinema.iter().zip(&anchors) {
        writeln!(out, "<section id=\"{}\">", attr(id))?;
        writeln!(
            out,
            "<h2><a href=\"{}\">{}</a></h2>",
            attr(&group.cinema.url),
            text(&group.cinema.name)
        )?;
        writeln!(out, "<table>")?;
        write!(out, "<tr><th></th>")?;
        for day in ctx.day_range {
            write!(out, "<th>{}</th>", day_label(day))?;
        }
        writeln!(out, "</tr>")?;
        for screening in &group.movies {
            write!(
                out,
                "<tr><td><a href=\"{}\">{}</a></td>",
                attr(&screening.movie.url),
                text(&screening.movie.title)
            )?;
            for bucket in show_times_by_day(&screening.cinema.show_times, ctx.day_range) {
                let times: Vec<String> = bucket.into_iter().map(format_show_time).collect();
                write!(out, "<td>{}</td>", times.join(" "))?;
            }
            writeln!(out, "</tr>")?;
        }
        writeln!(out, "</table>")?;
        writeln!(out, "</section>")?;
    }

    writeln!(out, "<section id=\"par-jour\">")?;
    for group in &ctx.movies_by_day {
        writeln!(out, "<h3>{}</h3>", day_label(&group.day))?;
        writeln!(out, "<ul>")?;
        for movie in &group.movies {
            if movie.image_url.is_empty() {
                writeln!(
                    out,
                    "<li><a href=\"{}\">{}</a></li>",
                    attr(&movie.url),
                    text(&movie.title)
                )?;
            } else {
                writeln!(
                    out,
                    "<li><a href=\"{}\"><img src=\"{}\" alt=\"Affiche\" /> {}</a></li>",
                    attr(&movie.url),
                    attr(&movie.image_url),
                    text(&movie.title)
                )?;
            }
        }
        writeln!(out, "</ul>")?;
    }
    writeln!(out, "</section>")?;

    writeln!(
        out,
        "<footer>Mis à jour le {}</footer>",
        ctx.generated_at.format("%d/%m/%Y %H:%M")
    )?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_by_cinema;
    use crate::model::{Cinema, Movie};

    fn at(d: u32, h: u32, m: u32) -> Showtime {
        Showtime::new(
            NaiveDate::from_ymd_opt(2022, 3, d)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap(),
        )
    }

    #[test]
    fn formats_hour_and_minute() {
        assert_eq!(format_show_time(&at(11, 9, 5)), "09:05");
    }

    #[test]
    fn buckets_align_with_day_range() {
        let times = vec![at(11, 14, 0), at(13, 20, 0), at(11, 21, 0), at(30, 10, 0)];
        let range: Vec<NaiveDate> = (10..=13)
            .map(|d| NaiveDate::from_ymd_opt(2022, 3, d).unwrap())
            .collect();
        let buckets = show_times_by_day(&times, &range);
        let sizes: Vec<usize> = buckets.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![0, 2, 0, 1]);
        assert_eq!(format_show_time(buckets[1][1]), "21:00");
    }

    #[test]
    fn slug_keeps_ascii_alphanumerics() {
        assert_eq!(cinema_slug("Reflet Médicis"), "reflet_m_dicis");
        assert_eq!(cinema_slug("Studio 28"), "studio_28");
    }

    fn cinema(name: &str) -> Cinema {
        Cinema {
            name: name.to_string(),
            url: String::new(),
            show_times: vec![at(11, 20, 0)],
        }
    }

    #[test]
    fn colliding_slugs_get_distinct_anchors() {
        let movies = vec![Movie {
            title: "Belfast".to_string(),
            url: String::new(),
            image_url: String::new(),
            cinemas: vec![cinema("Studio 28"), cinema("Studio-28"), cinema("Studio.28")],
        }];
        let groups = group_by_cinema(&movies);
        assert_eq!(
            cinema_anchors(&groups),
            vec!["studio_28", "studio_28_2", "studio_28_3"]
        );
    }

    #[test]
    fn anchors_do_not_collide_with_an_earlier_suffixed_name() {
        let movies = vec![Movie {
            title: "Belfast".to_string(),
            url: String::new(),
            image_url: String::new(),
            cinemas: vec![cinema("Studio 28 2"), cinema("Studio 28"), cinema("Studio-28")],
        }];
        let groups = group_by_cinema(&movies);
        let anchors = cinema_anchors(&groups);
        let unique: HashSet<&String> = anchors.iter().collect();
        assert_eq!(unique.len(), 3);
    }
}
