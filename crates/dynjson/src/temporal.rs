//! Canonical text forms for date/time, duration and GUID scalars.
//!
//! Opaque scalars are stored as strings. The form depends on time-zone
//! awareness:
//!
//! - zone-qualified: `2024-05-06T07:08:09.1234567+09:00`
//! - UTC:            `2024-05-06T07:08:09.1234567Z`
//! - zone-naive:     `2024-05-06T07:08:09.1234567`
//!
//! Fractions always carry seven digits (100ns ticks). Durations use
//! `[-][d.]hh:mm:ss[.fffffff]`.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc};

const STAMP: &str = "%Y-%m-%dT%H:%M:%S";
const NANOS_PER_TICK: u32 = 100;

fn ticks(nanos: u32) -> String {
    // Leap seconds report nanos >= 1e9; fold them into the same second.
    format!(".{:07}", (nanos % 1_000_000_000) / NANOS_PER_TICK)
}

/// Zone-naive round-trip form, no trailing `Z`.
pub fn format_naive(dt: &NaiveDateTime) -> String {
    format!("{}{}", dt.format(STAMP), ticks(dt.nanosecond()))
}

/// UTC round-trip form with a trailing `Z`.
pub fn format_utc(dt: &DateTime<Utc>) -> String {
    format!("{}Z", format_naive(&dt.naive_utc()))
}

/// Zone-qualified form with a `±hh:mm` offset.
pub fn format_zoned<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    let fixed = dt.fixed_offset();
    format!(
        "{}{}",
        format_naive(&fixed.naive_local()),
        fixed.format("%:z")
    )
}

pub fn parse_zoned(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s.trim()).ok()
}

/// Accepts any zone-qualified form; a zone-naive form is read as UTC.
pub fn parse_utc(s: &str) -> Option<DateTime<Utc>> {
    if let Some(dt) = parse_zoned(s) {
        return Some(dt.with_timezone(&Utc));
    }
    parse_naive(s).map(|naive| naive.and_utc())
}

/// Accepts the zone-naive form, tolerating a trailing `Z`. A zone-qualified
/// form keeps its local wall-clock time.
pub fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    let bare = s.strip_suffix('Z').unwrap_or(s);
    NaiveDateTime::parse_from_str(bare, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| parse_zoned(s).map(|dt| dt.naive_local()))
}

pub fn format_duration(d: &TimeDelta) -> String {
    let negative = *d < TimeDelta::zero();
    let abs = if negative { -*d } else { *d };
    let total = abs.num_seconds();
    let nanos = abs.subsec_nanos().unsigned_abs();

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    let days = total / 86_400;
    if days > 0 {
        out.push_str(&format!("{}.", days));
    }
    out.push_str(&format!(
        "{:02}:{:02}:{:02}",
        (total % 86_400) / 3_600,
        (total % 3_600) / 60,
        total % 60
    ));
    if nanos > 0 {
        out.push_str(&ticks(nanos));
    }
    out
}

pub fn parse_duration(s: &str) -> Option<TimeDelta> {
    let s = s.trim();
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    // A '.' before the first ':' separates the day count.
    let first_colon = body.find(':')?;
    let (days, clock) = match body[..first_colon].find('.') {
        Some(dot) => (body[..dot].parse::<i64>().ok()?, &body[dot + 1..]),
        None => (0, body),
    };

    let mut parts = clock.splitn(3, ':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let rest = parts.next()?;
    let (seconds, fraction) = match rest.split_once('.') {
        Some((secs, frac)) => (secs, Some(frac)),
        None => (rest, None),
    };
    let seconds: i64 = seconds.parse().ok()?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return None;
    }

    let nanos = match fraction {
        Some(frac) => parse_fraction(frac)?,
        None => 0,
    };

    let total = days
        .checked_mul(86_400)?
        .checked_add(hours * 3_600 + minutes * 60 + seconds)?;
    let delta = TimeDelta::new(total, nanos)?;
    Some(if negative { -delta } else { delta })
}

/// `1` → 100_000_000ns, `1234567` → 123_456_700ns.
fn parse_fraction(frac: &str) -> Option<u32> {
    if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    format!("{:0<9}", frac).parse().ok()
}
