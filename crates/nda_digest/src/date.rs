use chrono::{Datelike, Locale, NaiveDate};

// Monday-indexed, matching chrono's num_days_from_monday.
const WEEKDAYS_DE: [&str; 7] = [
    "Montag",
    "Dienstag",
    "Mittwoch",
    "Donnerstag",
    "Freitag",
    "Samstag",
    "Sonntag",
];

// 1-indexed, slot 0 unused.
const MONTHS_DE: [&str; 13] = [
    "",
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// Formats a date as `"Montag, 04. August 2025"` for the digest header and
/// subject line. Tries the German locale data first (de_DE, then de_AT) and
/// falls back to a fixed name table, so this always returns a usable string
/// and never touches process-wide locale state.
pub fn format_digest_date(date: NaiveDate) -> String {
    locale_date(date, Locale::de_DE)
        .or_else(|| locale_date(date, Locale::de_AT))
        .unwrap_or_else(|| table_date(date))
}

fn locale_date(date: NaiveDate, locale: Locale) -> Option<String> {
    let formatted = date.format_localized("%A, %d. %B %Y", locale).to_string();
    // A locale whose data does not carry German day names is rejected here
    // so the table fallback takes over.
    WEEKDAYS_DE
        .iter()
        .any(|day| formatted.starts_with(day))
        .then_some(formatted)
}

/// Manual fallback using the fixed German name tables.
pub(crate) fn table_date(date: NaiveDate) -> String {
    let weekday = WEEKDAYS_DE[date.weekday().num_days_from_monday() as usize];
    let month = MONTHS_DE[date.month() as usize];
    format!("{}, {:02}. {} {}", weekday, date.day(), month, date.year())
}
