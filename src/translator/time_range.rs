use super::error::FormatError;
use super::rewrite::try_replace_all;
use chrono::offset::LocalResult;
use chrono::{NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use regex::Regex;
use std::sync::LazyLock;

/// Field names the PAN dialect accepts for the log timestamp. Both translate
/// to `TimeGenerated`.
pub const TIME_FIELDS: [&str; 2] = ["time_generated", "receive_time"];

const PAN_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
const KQL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\(\s*(?:time_generated|receive_time) geq '(\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2})'.*\)\s+and\s+\(.*(?:time_generated|receive_time) leq '(\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2})'\s*\)",
    )
    .expect("valid time range regex")
});
static SINGLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:time_generated|receive_time) ([gl]eq) '(\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2})'",
    )
    .expect("valid single time regex")
});
static TIME_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"time_generated|receive_time").expect("valid time field regex"));

/// Direction of a single-bound time predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// `geq`
    AtLeast,
    /// `leq`
    AtMost,
}

impl Bound {
    fn from_token(token: &str) -> Self {
        if token == "geq" {
            Bound::AtLeast
        } else {
            Bound::AtMost
        }
    }

    fn operator(&self) -> &'static str {
        match self {
            Bound::AtLeast => ">=",
            Bound::AtMost => "<=",
        }
    }
}

/// A time predicate recognised in the query, consumed as soon as it is rendered
#[derive(Debug, Clone, Copy)]
enum TimeSpec<'a> {
    Range { start: &'a str, end: &'a str },
    Single { bound: Bound, literal: &'a str },
}

impl TimeSpec<'_> {
    fn render(&self, tz: Tz) -> Result<String, FormatError> {
        match self {
            TimeSpec::Range { start, end } => Ok(format!(
                "TimeGenerated between(datetime('{}') .. datetime('{}'))",
                to_utc(start, tz)?,
                to_utc(end, tz)?
            )),
            TimeSpec::Single { bound, literal } => Ok(format!(
                "TimeGenerated {} todatetime('{}')",
                bound.operator(),
                to_utc(literal, tz)?
            )),
        }
    }
}

/// Convert a PAN wall-clock timestamp in `tz` to a UTC KQL timestamp string.
///
/// Ambiguous wall-clock times (the repeated hour when daylight saving ends)
/// resolve to the earlier instant.
pub fn to_utc(literal: &str, tz: Tz) -> Result<String, FormatError> {
    let naive = NaiveDateTime::parse_from_str(literal, PAN_TIMESTAMP_FORMAT).map_err(|e| {
        FormatError::InvalidTimestamp {
            literal: literal.to_string(),
            reason: e.to_string(),
        }
    })?;

    // chrono reads `:60` as a leap second
    if naive.nanosecond() >= 1_000_000_000 {
        return Err(FormatError::InvalidTimestamp {
            literal: literal.to_string(),
            reason: "second out of range".to_string(),
        });
    }

    let local = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            return Err(FormatError::NonexistentLocalTime {
                literal: literal.to_string(),
                timezone: tz.name().to_string(),
            });
        }
    };

    Ok(local
        .with_timezone(&Utc)
        .format(KQL_TIMESTAMP_FORMAT)
        .to_string())
}

/// Rewrite `time_generated`/`receive_time` predicates into `TimeGenerated`
/// predicates with UTC literals.
///
/// A `( geq ) and ( leq )` range takes precedence. Otherwise exactly one time
/// field reference is allowed and it must be a single `geq`/`leq` bound.
pub fn translate_time_range(query: &str, tz: Tz) -> Result<String, FormatError> {
    if !TIME_FIELDS.iter().any(|field| query.contains(field)) {
        return Ok(query.to_string());
    }

    if RANGE_RE.is_match(query) {
        return try_replace_all(&RANGE_RE, query, |caps| {
            TimeSpec::Range {
                start: caps.get(1).map_or("", |m| m.as_str()),
                end: caps.get(2).map_or("", |m| m.as_str()),
            }
            .render(tz)
        });
    }

    let occurrences = TIME_FIELD_RE.find_iter(query).count();
    if occurrences > 1 || !SINGLE_RE.is_match(query) {
        return Err(FormatError::MalformedTimeFilter { occurrences });
    }

    try_replace_all(&SINGLE_RE, query, |caps| {
        TimeSpec::Single {
            bound: Bound::from_token(caps.get(1).map_or("", |m| m.as_str())),
            literal: caps.get(2).map_or("", |m| m.as_str()),
        }
        .render(tz)
    })
}
