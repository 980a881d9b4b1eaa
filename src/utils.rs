use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::parsing::Parsed;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime};

use crate::constants::{ACCESSIBLE_TITLE_FALLBACK, ALT_TITLE_FALLBACK, UNKNOWN_DATE};
use crate::core::MediaRecord;

/// Long calendar form ("June 3, 2024"). Empty input is reported as unknown and
/// anything unparseable is echoed back untouched.
pub fn format_date(value: Option<&str>) -> String {
    let raw = match value {
        Some(raw) if !raw.is_empty() => raw,
        _ => return UNKNOWN_DATE.to_string(),
    };
    match parse_date(raw.trim()) {
        Some(date) => date
            .format(format_description!(
                "[month repr:long] [day padding:none], [year]"
            ))
            .unwrap_or_else(|_| raw.to_string()),
        None => raw.to_string(),
    }
}

fn parse_date(raw: &str) -> Option<Date> {
    if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Some(date);
    }
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt.date());
    }
    if let Ok(dt) = PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Some(dt.date());
    }
    // Reduced precision: "2024-06" is the first of the month, "2024" is January 1.
    let parsed = parse_exact(raw, format_description!("[year]-[month]"))
        .or_else(|| parse_exact(raw, format_description!("[year]")))?;
    let month = parsed.month().unwrap_or(Month::January);
    Date::from_calendar_date(parsed.year()?, month, 1).ok()
}

fn parse_exact(raw: &str, items: &[BorrowedFormatItem<'_>]) -> Option<Parsed> {
    let mut parsed = Parsed::new();
    let rest = parsed.parse_items(raw.as_bytes(), items).ok()?;
    rest.is_empty().then_some(parsed)
}

pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

pub fn alt_text(record: &MediaRecord, video_thumb: bool) -> String {
    let title = non_empty(record.title.as_deref()).unwrap_or(ALT_TITLE_FALLBACK);
    let date = format_date(record.date.as_deref());
    let suffix = if video_thumb { " video thumbnail" } else { "" };
    format!("{title} ({date}){suffix}")
}

pub fn accessible_label(record: &MediaRecord) -> String {
    let title = non_empty(record.title.as_deref()).unwrap_or(ACCESSIBLE_TITLE_FALLBACK);
    let date = format_date(record.date.as_deref());
    format!("View details for {title} from {date}.")
}
