use std::fmt::Display;
use std::iter;
use std::sync::OnceLock;

use chrono::NaiveDate;
use itertools::Itertools;
use regex::Regex;

use super::ReportRow;

pub const CSV_HEADER: &str = "Player Name,Date,Course,Score,Par,Weather,Wind (kph),Temp (C)";
const ALL_SQUADS: &str = "All";

fn quoted(value: Option<&str>) -> String {
    format!("\"{}\"", value.unwrap_or_default().replace('"', "\"\""))
}

fn number<T: Display>(value: Option<T>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

impl ReportRow {
    fn to_csv_line(&self) -> String {
        [
            quoted(Some(self.player_name.as_str())),
            quoted(self.date.map(|date| date.format("%Y-%m-%d").to_string()).as_deref()),
            quoted(self.course.as_deref()),
            number(self.score),
            number(self.par),
            quoted(self.weather.as_deref()),
            number(self.wind_kph),
            number(self.temp_c),
        ]
        .join(",")
    }
}

/// Header plus one line per row, `\n` separated, without a trailing newline.
pub fn to_csv(rows: &[ReportRow]) -> String {
    iter::once(CSV_HEADER.to_owned())
        .chain(rows.iter().map(ReportRow::to_csv_line))
        .join("\n")
}

fn whitespace() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern"))
}

fn disallowed() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^A-Za-z0-9-]").expect("filename pattern"))
}

/// `PGC-Report-{squad}-{YYYY-MM-DD}.csv`, keeping only letters, digits and
/// hyphens of the squad name.
pub fn report_filename(squad_name: Option<&str>, date: NaiveDate) -> String {
    let squad = squad_name.map(str::trim).filter(|name| !name.is_empty()).unwrap_or(ALL_SQUADS);
    let hyphenated = whitespace().replace_all(squad, "-");
    let sanitized = disallowed().replace_all(&hyphenated, "");
    format!("PGC-Report-{}-{}.csv", sanitized, date.format("%Y-%m-%d"))
}
