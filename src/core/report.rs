use crate::domain::model::{Chain, ResolvedQuery, Showtime};
use crate::utils::error::Result;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const MISSING: &str = "-";

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(MISSING)
}

fn seats(showtime: &Showtime) -> String {
    let count = |value: Option<u32>| value.map_or_else(|| MISSING.to_string(), |n| n.to_string());
    format!(
        "{}/{}",
        count(showtime.remaining_seats),
        count(showtime.total_seats)
    )
}

/// Writes one entry per showtime, in the order the API returned them.
pub fn render<W: Write>(
    out: &mut W,
    chain: Chain,
    query: &ResolvedQuery,
    showtimes: &[Showtime],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, showtimes)?;
            writeln!(out)?;
        }
        OutputFormat::Text => match chain {
            Chain::Megabox => render_table(out, query, showtimes)?,
            Chain::Lotte => render_blocks(out, query, showtimes)?,
        },
    }
    Ok(())
}

fn render_table<W: Write>(out: &mut W, query: &ResolvedQuery, showtimes: &[Showtime]) -> Result<()> {
    if showtimes.is_empty() {
        writeln!(
            out,
            "\nNo showtimes for '{}' at '{}'.",
            query.movie_label, query.theater_label
        )?;
        return Ok(());
    }

    let rule = "=".repeat(65);
    writeln!(out, "\n[ {} - {} ]", query.theater_label, query.movie_label)?;
    writeln!(out, "{}", rule)?;
    writeln!(
        out,
        "{:<10} | {:<10} | {:<17} | {:<18} | {}",
        "Start", "End", "Movie", "Screen", "Seats"
    )?;
    writeln!(out, "{}", "-".repeat(65))?;
    for showtime in showtimes {
        writeln!(
            out,
            "{:<10} | {:<10} | {:<17} | {:<18} | {}",
            text(&showtime.start_time),
            text(&showtime.end_time),
            text(&showtime.movie_name),
            text(&showtime.screen_name),
            seats(showtime)
        )?;
    }
    writeln!(out, "{}", rule)?;
    Ok(())
}

fn render_blocks<W: Write>(
    out: &mut W,
    query: &ResolvedQuery,
    showtimes: &[Showtime],
) -> Result<()> {
    writeln!(
        out,
        "--- {} {} showtimes ---",
        Chain::Lotte.display_name(),
        query.theater_label
    )?;

    if showtimes.is_empty() {
        writeln!(out, "No showtimes found.")?;
        return Ok(());
    }

    for showtime in showtimes {
        writeln!(
            out,
            "[{} ~ {}] {}",
            text(&showtime.start_time),
            text(&showtime.end_time),
            text(&showtime.movie_name)
        )?;
        writeln!(
            out,
            "   Screen: {} | Seats: {}",
            text(&showtime.screen_name),
            seats(showtime)
        )?;
        writeln!(out, "{}", "-".repeat(40))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn query() -> ResolvedQuery {
        ResolvedQuery {
            theater_code: "0023".to_string(),
            movie_code: "25104500".to_string(),
            theater_label: "Daejeon".to_string(),
            movie_label: "If We".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 14).unwrap(),
        }
    }

    fn showtime(start: &str, screen: &str, remaining: u32, total: u32) -> Showtime {
        Showtime {
            movie_name: Some("If We".to_string()),
            start_time: Some(start.to_string()),
            end_time: Some("23:59".to_string()),
            screen_name: Some(screen.to_string()),
            remaining_seats: Some(remaining),
            total_seats: Some(total),
        }
    }

    fn rendered(chain: Chain, showtimes: &[Showtime], format: OutputFormat) -> String {
        let mut out = Vec::new();
        render(&mut out, chain, &query(), showtimes, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_table_has_one_row_per_showtime_in_order() {
        let output = rendered(
            Chain::Megabox,
            &[showtime("10:20", "Hall 1", 87, 120), showtime("13:00", "Hall 3", 12, 98)],
            OutputFormat::Text,
        );
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "[ Daejeon - If We ]");
        assert_eq!(lines[2], "=".repeat(65));
        assert!(lines[3].starts_with("Start      | End        | Movie"));
        assert_eq!(
            lines[5],
            "10:20      | 23:59      | If We             | Hall 1             | 87/120"
        );
        assert!(lines[6].starts_with("13:00"));
        assert!(lines[6].ends_with("12/98"));
        assert_eq!(lines[7], "=".repeat(65));
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_table_empty_prints_single_message() {
        let output = rendered(Chain::Megabox, &[], OutputFormat::Text);
        assert_eq!(output, "\nNo showtimes for 'If We' at 'Daejeon'.\n");
    }

    #[test]
    fn test_blocks_layout() {
        let output = rendered(
            Chain::Lotte,
            &[showtime("09:40", "4관", 143, 150)],
            OutputFormat::Text,
        );
        let expected = format!(
            "--- Lotte Cinema Daejeon showtimes ---\n[09:40 ~ 23:59] If We\n   Screen: 4관 | Seats: 143/150\n{}\n",
            "-".repeat(40)
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn test_blocks_empty_keeps_heading() {
        let output = rendered(Chain::Lotte, &[], OutputFormat::Text);
        assert_eq!(
            output,
            "--- Lotte Cinema Daejeon showtimes ---\nNo showtimes found.\n"
        );
    }

    #[test]
    fn test_missing_fields_render_as_dash() {
        let output = rendered(Chain::Lotte, &[Showtime::default()], OutputFormat::Text);
        assert!(output.contains("[- ~ -] -"));
        assert!(output.contains("Screen: - | Seats: -/-"));
    }

    #[test]
    fn test_json_output() {
        let output = rendered(
            Chain::Megabox,
            &[showtime("10:20", "Hall 1", 87, 120)],
            OutputFormat::Json,
        );
        let parsed: Vec<Showtime> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, vec![showtime("10:20", "Hall 1", 87, 120)]);

        let empty = rendered(Chain::Lotte, &[], OutputFormat::Json);
        assert_eq!(empty.trim(), "[]");
    }
}
