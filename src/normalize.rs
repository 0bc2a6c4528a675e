use chrono::{NaiveDateTime, Timelike};

use crate::ingest::RawRow;
use crate::models::{AgentPair, NormalizedRecord, WaitBucket};

/// Entry timestamps in the export are day-first with minute precision.
const ENTRY_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Parses an `H:MM[:SS]` wait duration into minutes. Placeholders (`-`),
/// empty strings, and anything that does not parse yield None; this function
/// never fails, bad values just carry no measurement.
pub fn parse_wait_minutes(raw: &str) -> Option<f64> {
    let value = raw.trim();
    if value.is_empty() || value == "-" || !value.contains(':') {
        return None;
    }

    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() < 2 {
        return None;
    }

    let hours: i64 = parts[0].trim().parse().ok()?;
    let minutes: i64 = parts[1].trim().parse().ok()?;
    let seconds: i64 = if parts.len() > 2 {
        parts[2].trim().parse().ok()?
    } else {
        0
    };

    Some(hours as f64 * 60.0 + minutes as f64 + seconds as f64 / 60.0)
}

/// Maps a wait measurement into its reporting band. Bounds are inclusive:
/// exactly 30.0 minutes belongs to the 11-30 band, not the next one.
pub fn classify_wait(minutes: Option<f64>) -> WaitBucket {
    match minutes {
        None => WaitBucket::NoData,
        Some(m) if m <= 1.0 => WaitBucket::UpTo1Min,
        Some(m) if m <= 5.0 => WaitBucket::OneToFive,
        Some(m) if m <= 10.0 => WaitBucket::SixToTen,
        Some(m) if m <= 30.0 => WaitBucket::ElevenToThirty,
        Some(m) if m <= 120.0 => WaitBucket::HalfHourToTwoHours,
        Some(_) => WaitBucket::OverTwoHours,
    }
}

pub fn parse_entry_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), ENTRY_TIMESTAMP_FORMAT).ok()
}

/// Keeps only rows owned by one of the tracked agents and parses their
/// fields. Rows with an unparsable timestamp are kept (with no date); rows
/// owned by anyone else are dropped. An empty result is a valid outcome.
pub fn normalize_rows(rows: &[RawRow], pair: &AgentPair) -> Vec<NormalizedRecord> {
    rows.iter()
        .filter_map(|row| {
            let agent = pair.match_owner(&row.owner)?;
            let entered = parse_entry_timestamp(&row.entered_at);
            let wait_minutes = row
                .wait_after_assignment
                .as_deref()
                .and_then(parse_wait_minutes);

            Some(NormalizedRecord {
                agent,
                entry_date: entered.map(|t| t.date()),
                entry_hour: entered.map(|t| t.hour()),
                wait_minutes,
                wait_bucket: classify_wait(wait_minutes),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AgentId;
    use chrono::NaiveDate;

    fn row(owner: &str, entered_at: &str, wait: Option<&str>) -> RawRow {
        RawRow {
            owner: owner.to_string(),
            entered_at: entered_at.to_string(),
            wait_after_assignment: wait.map(str::to_string),
        }
    }

    #[test]
    fn parses_clock_durations_to_minutes() {
        assert_eq!(parse_wait_minutes("1:30"), Some(90.0));
        assert_eq!(parse_wait_minutes("0:05:30"), Some(5.5));
        assert_eq!(parse_wait_minutes("0:45"), Some(45.0));
        assert_eq!(parse_wait_minutes("2:00"), Some(120.0));
        assert_eq!(parse_wait_minutes(" 0:10 "), Some(10.0));
    }

    #[test]
    fn rejects_placeholders_and_malformed_durations() {
        assert_eq!(parse_wait_minutes(""), None);
        assert_eq!(parse_wait_minutes("-"), None);
        assert_eq!(parse_wait_minutes("abc"), None);
        assert_eq!(parse_wait_minutes("12"), None);
        assert_eq!(parse_wait_minutes("1:xx"), None);
        assert_eq!(parse_wait_minutes("::"), None);
    }

    #[test]
    fn bucket_bounds_are_inclusive() {
        let cases = [
            (1.0, WaitBucket::UpTo1Min),
            (1.01, WaitBucket::OneToFive),
            (5.0, WaitBucket::OneToFive),
            (5.01, WaitBucket::SixToTen),
            (10.0, WaitBucket::SixToTen),
            (10.01, WaitBucket::ElevenToThirty),
            (30.0, WaitBucket::ElevenToThirty),
            (30.01, WaitBucket::HalfHourToTwoHours),
            (120.0, WaitBucket::HalfHourToTwoHours),
            (120.01, WaitBucket::OverTwoHours),
        ];
        for (minutes, expected) in cases {
            assert_eq!(classify_wait(Some(minutes)), expected, "at {minutes}");
        }
        assert_eq!(classify_wait(None), WaitBucket::NoData);
    }

    #[test]
    fn matches_owners_case_insensitively() {
        let pair = AgentPair::tracked();
        assert_eq!(pair.match_owner("NAURA Lima"), Some(AgentId::First));
        assert_eq!(pair.match_owner("atendente diessy"), Some(AgentId::Second));
        assert_eq!(pair.match_owner("Equipe Geral"), None);
    }

    #[test]
    fn ambiguous_owner_goes_to_the_first_identity() {
        let pair = AgentPair::tracked();
        assert_eq!(pair.match_owner("Diessy / Naura"), Some(AgentId::First));
    }

    #[test]
    fn keeps_rows_with_unparsable_timestamps() {
        let pair = AgentPair::tracked();
        let rows = vec![
            row("Naura Lima", "03/06/2025 09:15", Some("0:05")),
            row("Naura Lima", "not a date", Some("0:10")),
            row("Equipe Geral", "03/06/2025 11:00", None),
        ];

        let records = normalize_rows(&rows, &pair);
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].entry_date,
            NaiveDate::from_ymd_opt(2025, 6, 3)
        );
        assert_eq!(records[0].entry_hour, Some(9));
        assert_eq!(records[1].entry_date, None);
        assert_eq!(records[1].wait_minutes, Some(10.0));
    }

    #[test]
    fn missing_wait_column_becomes_no_data() {
        let pair = AgentPair::tracked();
        let rows = vec![row("Diessy Rocha", "03/06/2025 09:15", None)];

        let records = normalize_rows(&rows, &pair);
        assert_eq!(records[0].wait_minutes, None);
        assert_eq!(records[0].wait_bucket, WaitBucket::NoData);
    }
}
