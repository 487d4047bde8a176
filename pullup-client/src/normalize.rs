//! Turning backend payloads into the client's model.
//!
//! The backend is loose about what it sends: fields go missing, dates and times arrive as two
//! separate strings and the time is typed by hand ("9:05PM", "7:30 p.m.", "11:00  AM"). Nothing
//! here fails. Every gap gets a stock value and a warning in the log, and the returned
//! [`Normalized`] says which values were made up so callers can tell real data from filler.

use crate::domain::{Attendee, Comment, Event, QrWristband, User, Vote, WristbandValidation};
use once_cell::sync::Lazy;
use pullup_common::api::{
    BackendAttendee, BackendComment, BackendEvent, BackendUser, BackendWristband, RawTimestamp,
    WristbandValidationResponse,
};
use pullup_common::domain::Role;
use regex::{Captures, Regex};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::macros::{format_description, time};
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};
use tracing::warn;

pub const DEFAULT_TITLE: &str = "Untitled Event";
pub const DEFAULT_LOCATION: &str = "TBD";
pub const DEFAULT_ORGANIZER: &str = "Unknown Organization";
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x200?text=Pullup";

const NOON: Time = time!(12:00);

/// Tried in order, first match wins. The first one covers what the backend usually sends.
static TIME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^(\d{1,2}):(\d{2}) ([AP])M$",
        r"(?i)^(\d{1,2}):(\d{2})([AP])M$",
        r"(?i)^(\d{1,2}):(\d{2})\s+([AP])M$",
        r"(?i)^(\d{1,2}):(\d{2})\s*([AP])\.\s*M\.?$",
        r"(?i)^(\d{1,2})\s*[:.]\s*(\d{2})\s*([AP])\.?\s*M\.?$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTimeSource {
    /// Date and time were both read from the payload.
    Parsed,
    /// Only a date was sent; the time is noon.
    DateOnly,
    /// No date was sent; the value is the current time.
    Missing,
    /// Something was sent but could not be read; the value is the current time.
    DefaultedDueToError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDateTime {
    pub value: PrimitiveDateTime,
    pub source: DateTimeSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub value: T,
    /// Fields that were absent or blank and got a stock value.
    pub defaulted: Vec<&'static str>,
    /// How the event time was obtained, for payloads that carry one.
    pub date_time: Option<DateTimeSource>,
}

impl<T> Normalized<T> {
    pub fn is_clean(&self) -> bool {
        self.defaulted.is_empty()
            && matches!(self.date_time, None | Some(DateTimeSource::Parsed))
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub fn wall_clock(now: OffsetDateTime) -> PrimitiveDateTime {
    PrimitiveDateTime::new(now.date(), now.time())
}

/// `MM/DD/YYYY`
pub fn parse_backend_date(value: &str) -> Result<Date, String> {
    let parts = value.trim().split('/').collect::<Vec<_>>();
    if parts.len() != 3 {
        return Err(format!("date '{value}' is not MM/DD/YYYY"));
    }

    let month = parts[0]
        .trim()
        .parse::<u8>()
        .map_err(|_| format!("month '{}' is not a number", parts[0]))?;
    let day = parts[1]
        .trim()
        .parse::<u8>()
        .map_err(|_| format!("day '{}' is not a number", parts[1]))?;
    let year = parts[2]
        .trim()
        .parse::<i32>()
        .map_err(|_| format!("year '{}' is not a number", parts[2]))?;

    let month = Month::try_from(month).map_err(|_| format!("month {month} is out of range"))?;
    Date::from_calendar_date(year, month, day).map_err(|e| format!("date '{value}': {e}"))
}

/// `H:MM AM` in any of the spellings the backend has been seen to produce.
fn time_captures(value: &str) -> Option<(usize, Captures<'_>)> {
    TIME_PATTERNS
        .iter()
        .enumerate()
        .find_map(|(i, p)| p.captures(value).map(|c| (i, c)))
}

pub fn parse_backend_time(value: &str) -> Result<Time, String> {
    let value = value.trim();
    let (_, captures) = time_captures(value)
        .ok_or_else(|| format!("time '{value}' matches no known pattern"))?;

    let hour = captures[1]
        .parse::<u8>()
        .map_err(|_| format!("hour in '{value}' is not a number"))?;
    let minute = captures[2]
        .parse::<u8>()
        .map_err(|_| format!("minute in '{value}' is not a number"))?;
    let pm = captures[3].eq_ignore_ascii_case("p");

    if !(1..=12).contains(&hour) || minute > 59 {
        return Err(format!("time '{value}' is out of range"));
    }

    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };

    Time::from_hms(hour, minute, 0).map_err(|e| format!("time '{value}': {e}"))
}

/// Combine the separate date and time strings into one wall-clock value, never failing.
pub fn resolve_date_time(
    date: Option<&str>,
    time: Option<&str>,
    now: PrimitiveDateTime,
) -> ResolvedDateTime {
    let date = date.map(str::trim).filter(|v| !v.is_empty());
    let time = time.map(str::trim).filter(|v| !v.is_empty());

    let parsed = match (date, time) {
        (Some(d), Some(t)) => parse_backend_date(d)
            .and_then(|date| parse_backend_time(t).map(|time| PrimitiveDateTime::new(date, time)))
            .map(|v| (v, DateTimeSource::Parsed)),
        (Some(d), None) => parse_backend_date(d)
            .map(|date| (PrimitiveDateTime::new(date, NOON), DateTimeSource::DateOnly)),
        (None, _) => Ok((now, DateTimeSource::Missing)),
    };

    match parsed {
        Ok((value, source)) => ResolvedDateTime { value, source },
        Err(reason) => {
            warn!("Error parsing event date/time, using current time: {reason}");
            ResolvedDateTime {
                value: now,
                source: DateTimeSource::DefaultedDueToError(reason),
            }
        }
    }
}

pub fn format_backend_date(date: Date) -> String {
    format!("{:02}/{:02}/{}", u8::from(date.month()), date.day(), date.year())
}

pub fn format_backend_time(time: Time) -> String {
    let (hour, meridiem) = match time.hour() {
        0 => (12, "AM"),
        h @ 1..=11 => (h, "AM"),
        12 => (12, "PM"),
        h => (h - 12, "PM"),
    };
    format!("{}:{:02} {}", hour, time.minute(), meridiem)
}

/// RFC 3339, `YYYY-MM-DD HH:MM:SS` (taken as UTC), or unix seconds. Millisecond epochs are
/// recognised by their size.
pub fn parse_timestamp(raw: &RawTimestamp) -> Option<OffsetDateTime> {
    fn from_epoch(n: i64) -> Option<OffsetDateTime> {
        let secs = if n.abs() > 100_000_000_000 { n / 1000 } else { n };
        OffsetDateTime::from_unix_timestamp(secs).ok()
    }

    match raw {
        RawTimestamp::Seconds(n) => from_epoch(*n),
        RawTimestamp::Text(s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<i64>() {
                return from_epoch(n);
            }
            if let Ok(v) = OffsetDateTime::parse(s, &Rfc3339) {
                return Some(v);
            }
            let spaced = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
            let tee = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
            PrimitiveDateTime::parse(s, &spaced)
                .or_else(|_| PrimitiveDateTime::parse(s, &tee))
                .map(PrimitiveDateTime::assume_utc)
                .ok()
        }
    }
}

/// Accept a bare array, or an object holding the array under `key`. Anything else is `None`.
pub fn list_payload(value: Value, key: &str) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// Unwrap `{ key: {...} }` if the payload is wrapped, otherwise return it as is.
pub fn object_payload(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) if matches!(map.get(key), Some(Value::Object(_))) => {
            map.remove(key).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Decode every item of a list payload, skipping the ones that do not fit. A payload with no
/// list at all is treated as an empty list.
pub fn decode_list<T: DeserializeOwned>(value: Value, key: &str) -> Vec<T> {
    let Some(items) = list_payload(value, key) else {
        warn!("expected a list of '{key}' in the response, treating it as empty");
        return vec![];
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("skipping malformed '{key}' item: {e}");
                None
            }
        })
        .collect()
}

struct Fill {
    defaulted: Vec<&'static str>,
}

impl Fill {
    fn new() -> Self {
        Self { defaulted: vec![] }
    }

    fn text(&mut self, field: &'static str, value: Option<String>, default: &str) -> String {
        match value.filter(|v| !v.trim().is_empty()) {
            Some(v) => v,
            None => {
                self.defaulted.push(field);
                default.to_string()
            }
        }
    }

    fn id(&mut self, field: &'static str, value: Option<i64>) -> String {
        match value {
            Some(v) => v.to_string(),
            None => {
                self.defaulted.push(field);
                String::new()
            }
        }
    }

    fn timestamp(
        &mut self,
        field: &'static str,
        value: Option<&RawTimestamp>,
        default: OffsetDateTime,
    ) -> OffsetDateTime {
        match value.and_then(parse_timestamp) {
            Some(v) => v,
            None => {
                self.defaulted.push(field);
                default
            }
        }
    }

    fn done<T>(self, value: T, date_time: Option<DateTimeSource>) -> Normalized<T> {
        if !self.defaulted.is_empty() {
            tracing::debug!("defaulted fields: {:?}", self.defaulted);
        }
        Normalized {
            value,
            defaulted: self.defaulted,
            date_time,
        }
    }
}

fn count(value: Option<i64>) -> u32 {
    value
        .map(|v| u32::try_from(v.max(0)).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

pub fn normalize_event(raw: BackendEvent, now: OffsetDateTime) -> Normalized<Event> {
    let mut fill = Fill::new();
    let resolved = resolve_date_time(raw.date.as_deref(), raw.time.as_deref(), wall_clock(now));

    let is_public = match raw.is_public {
        Some(v) => v,
        None => {
            fill.defaulted.push("is_public");
            true
        }
    };

    let event = Event {
        id: fill.id("event_id", raw.event_id),
        title: fill.text("title", raw.title, DEFAULT_TITLE),
        description: fill.text("description", raw.description, ""),
        organizer_id: fill.id("org_id", raw.org_id),
        organizer_name: fill.text("org_name", raw.org_name, DEFAULT_ORGANIZER),
        organizer_image_url: raw.org_image_url.filter(|v| !v.trim().is_empty()),
        location: fill.text("location", raw.location, DEFAULT_LOCATION),
        date_time: resolved.value,
        image_url: fill.text("image_url", raw.image_url, PLACEHOLDER_IMAGE),
        is_private: !is_public,
        pull_up_count: count(raw.participant_count),
        user_pulled_up: raw.is_registered.unwrap_or(false),
        event_password: raw.passcode.filter(|v| !v.is_empty()),
        created_at: fill.timestamp("created_at", raw.created_at.as_ref(), now),
    };

    fill.done(event, Some(resolved.source))
}

/// `role` is what the caller logged in as, used when the payload does not say.
pub fn normalize_user(raw: BackendUser, role: Role) -> Normalized<User> {
    let mut fill = Fill::new();

    let user_type = match raw.user_type.as_deref().map(Role::from_str) {
        Some(Ok(v)) => v,
        _ => {
            fill.defaulted.push("user_type");
            role
        }
    };

    let email_name = raw
        .email
        .as_deref()
        .and_then(|e| e.split('@').next())
        .map(str::to_string);
    let username = fill.text("username", raw.username.or(email_name), "unknown");
    let display_name = fill.text("display_name", raw.display_name, &username);

    let user = User {
        id: fill.id("id", raw.id),
        username,
        display_name,
        is_organization: user_type == Role::Org,
        profile_image_url: raw.profile_image_url.filter(|v| !v.trim().is_empty()),
        user_type,
    };

    fill.done(user, None)
}

pub fn normalize_comment(raw: BackendComment, now: OffsetDateTime) -> Normalized<Comment> {
    let mut fill = Fill::new();

    let comment = Comment {
        id: fill.id("comment_id", raw.comment_id),
        event_id: fill.id("event_id", raw.event_id),
        user_id: fill.id("student_id", raw.student_id),
        username: fill.text("username", raw.username, "Anonymous"),
        user_image_url: raw.user_image_url.filter(|v| !v.trim().is_empty()),
        text: fill.text("text", raw.text, ""),
        created_at: fill.timestamp("created_at", raw.created_at.as_ref(), now),
        upvotes: count(raw.upvotes),
        downvotes: count(raw.downvotes),
        user_vote: raw.user_vote.and_then(|v| Vote::from_str(&v).ok()),
    };

    fill.done(comment, None)
}

/// `event_id` fills in for payloads that leave the event out, which the attendee listing does.
pub fn normalize_attendee(
    raw: BackendAttendee,
    event_id: &str,
    now: OffsetDateTime,
) -> Normalized<Attendee> {
    let mut fill = Fill::new();

    let user_id = fill.id("student_id", raw.student_id);
    let event_id = raw
        .event_id
        .map(|v| v.to_string())
        .unwrap_or_else(|| event_id.to_string());
    let email_name = raw
        .email
        .as_deref()
        .and_then(|e| e.split('@').next())
        .map(str::to_string);
    let username = fill.text("username", raw.username.or(email_name), "unknown");
    let display_name = fill.text("name", raw.name, &username);

    let attendee = Attendee {
        id: format!("{event_id}-{user_id}"),
        event_id,
        user_id,
        username,
        display_name,
        is_confirmed: raw.is_confirmed.unwrap_or(false),
        registered_at: fill.timestamp("registered_at", raw.registered_at.as_ref(), now),
    };

    fill.done(attendee, None)
}

/// A wristband without an expiry is shown as already expired.
pub fn normalize_wristband(raw: BackendWristband, now: OffsetDateTime) -> Normalized<QrWristband> {
    let mut fill = Fill::new();

    let created_at = fill.timestamp("created_at", raw.created_at.as_ref(), now);
    let wristband = QrWristband {
        id: fill.id("wristband_id", raw.wristband_id),
        event_id: fill.id("event_id", raw.event_id),
        user_id: fill.id("student_id", raw.student_id),
        code: fill.text("code", raw.code, ""),
        expires_at: fill.timestamp("expires_at", raw.expires_at.as_ref(), created_at),
        created_at,
    };

    fill.done(wristband, None)
}

pub fn normalize_validation(raw: WristbandValidationResponse) -> WristbandValidation {
    WristbandValidation {
        is_valid: raw.is_valid,
        event_id: raw.event_id.map(|v| v.to_string()),
        user_id: raw.student_id.map(|v| v.to_string()),
        message: raw.message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use serde_json::json;
    use time::macros::{date, datetime, time};

    const NOW: OffsetDateTime = datetime!(2024-06-01 10:30 UTC);

    #[test]
    fn empty_event_gets_every_default() {
        let normalized = normalize_event(BackendEvent::default(), NOW);
        let event = &normalized.value;

        assert_eq!(event.title, DEFAULT_TITLE);
        assert_eq!(event.description, "");
        assert_eq!(event.location, DEFAULT_LOCATION);
        assert_eq!(event.image_url, PLACEHOLDER_IMAGE);
        assert_eq!(event.organizer_name, DEFAULT_ORGANIZER);
        assert!(!event.is_private);
        assert!(!event.user_pulled_up);
        assert_eq!(event.pull_up_count, 0);
        assert_eq!(event.event_password, None);
        assert_eq!(event.date_time, wall_clock(NOW));
        assert_eq!(event.created_at, NOW);

        assert_eq!(normalized.date_time, Some(DateTimeSource::Missing));
        assert!(!normalized.is_clean());
        for field in ["title", "location", "image_url", "org_name", "is_public", "created_at"] {
            assert!(normalized.defaulted.contains(&field), "{field}");
        }
    }

    #[test]
    fn full_event_is_clean() {
        let raw: BackendEvent = serde_json::from_value(json!({
            "event_id": 12,
            "org_id": 7,
            "org_name": "Outing Club",
            "title": "Night Hike",
            "description": "Bring a headlamp",
            "location": "Dish Trail",
            "date": "12/25/2024",
            "time": "9:05PM",
            "image_url": "https://img.example/hike.png",
            "is_public": false,
            "passcode": "owl",
            "participant_count": 14,
            "is_registered": true,
            "created_at": "2024-11-01T08:00:00Z"
        }))
        .unwrap();

        let normalized = normalize_event(raw, NOW);
        assert!(normalized.is_clean(), "{:?}", normalized.defaulted);

        let event = normalized.value;
        assert_eq!(event.id, "12");
        assert_eq!(event.organizer_id, "7");
        assert_eq!(event.date_time, datetime!(2024-12-25 21:05));
        assert!(event.is_private);
        assert_eq!(event.event_password.as_deref(), Some("owl"));
        assert_eq!(event.pull_up_count, 14);
        assert!(event.user_pulled_up);
        assert_eq!(event.created_at, datetime!(2024-11-01 08:00 UTC));
    }

    #[test]
    fn meridiem_edges() {
        let now = wall_clock(NOW);
        let midnight = resolve_date_time(Some("12/25/2024"), Some("12:00AM"), now);
        assert_eq!(midnight.value.hour(), 0);
        assert_eq!(midnight.source, DateTimeSource::Parsed);

        let noon = resolve_date_time(Some("12/25/2024"), Some("12:00PM"), now);
        assert_eq!(noon.value.hour(), 12);

        let morning = resolve_date_time(Some("12/25/2024"), Some("9:05 am"), now);
        assert_eq!(morning.value.time(), time!(9:05));
    }

    #[test]
    fn fallback_spellings() {
        for (input, expected) in [
            ("7:30   PM", time!(19:30)),
            ("7:30 P.M.", time!(19:30)),
            ("7:30p.m.", time!(19:30)),
            ("11:15 a. m.", time!(11:15)),
            ("8.45 pm", time!(20:45)),
            (" 10:00 AM ", time!(10:00)),
        ] {
            assert_eq!(parse_backend_time(input), Ok(expected), "{input}");
        }
    }

    #[test]
    fn spellings_resolve_in_pattern_order() {
        for (input, pattern) in [
            ("9:05 PM", 0),
            ("9:05PM", 1),
            ("9:05  PM", 2),
            ("9:05 p.m.", 3),
            ("9.05 PM", 4),
        ] {
            let (index, _) = time_captures(input).unwrap();
            assert_eq!(index, pattern, "{input}");
        }
        assert!(time_captures("21:05").is_none());
    }

    #[test]
    fn unreadable_time_falls_back_to_now() {
        let now = wall_clock(NOW);
        for time in ["19:30", "noon", "13:00 PM", "9:75 AM"] {
            let resolved = resolve_date_time(Some("12/25/2024"), Some(time), now);
            assert_eq!(resolved.value, now, "{time}");
            assert!(
                matches!(resolved.source, DateTimeSource::DefaultedDueToError(_)),
                "{time}"
            );
        }
    }

    #[test]
    fn malformed_dates_fall_back_to_now() {
        let now = wall_clock(NOW);
        for date in ["13/01/2024", "02/30/2024", "2024-12-25", "aa/bb/cccc"] {
            let resolved = resolve_date_time(Some(date), Some("9:00 AM"), now);
            assert_eq!(resolved.value, now, "{date}");
            assert!(matches!(
                resolved.source,
                DateTimeSource::DefaultedDueToError(_)
            ));
        }
    }

    #[test]
    fn date_only_is_noon_and_time_only_is_now() {
        let now = wall_clock(NOW);
        let resolved = resolve_date_time(Some("03/09/2025"), None, now);
        assert_eq!(resolved.value, datetime!(2025-03-09 12:00));
        assert_eq!(resolved.source, DateTimeSource::DateOnly);

        let resolved = resolve_date_time(None, Some("9:00 AM"), now);
        assert_eq!(resolved.value, now);
        assert_eq!(resolved.source, DateTimeSource::Missing);

        let resolved = resolve_date_time(Some("  "), Some(""), now);
        assert_eq!(resolved.source, DateTimeSource::Missing);
    }

    #[test]
    fn backend_formatting_reads_back() {
        assert_eq!(format_backend_date(date!(2024-03-09)), "03/09/2024");
        assert_eq!(format_backend_time(time!(0:05)), "12:05 AM");
        assert_eq!(format_backend_time(time!(12:00)), "12:00 PM");
        assert_eq!(format_backend_time(time!(21:05)), "9:05 PM");
        assert_eq!(parse_backend_time("9:05 PM"), Ok(time!(21:05)));
    }

    #[quickcheck]
    fn any_twelve_hour_spelling_reads_as_24h(hour: u8, minute: u8, pm: bool, style: u8) -> bool {
        let hour = hour % 12 + 1;
        let minute = minute % 60;
        let meridiem = match (style % 4, pm) {
            (0, true) => "PM",
            (0, false) => "AM",
            (1, true) => "pm",
            (1, false) => "am",
            (2, true) => "P.M.",
            (2, false) => "A.M.",
            (_, true) => "p.m.",
            (_, false) => "a.m.",
        };
        let sep = ["", " ", "  "][(style / 4 % 3) as usize];
        let input = format!("{hour}:{minute:02}{sep}{meridiem}");

        let expected = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };

        parse_backend_time(&input) == Ok(Time::from_hms(expected, minute, 0).unwrap())
    }

    #[test]
    fn timestamps_in_several_shapes() {
        let expected = datetime!(2023-07-22 04:26:40 UTC);
        for raw in [
            RawTimestamp::Seconds(1690000000),
            RawTimestamp::Seconds(1690000000000),
            RawTimestamp::Text("1690000000".into()),
            RawTimestamp::Text("2023-07-22T04:26:40Z".into()),
            RawTimestamp::Text("2023-07-22 04:26:40".into()),
        ] {
            assert_eq!(parse_timestamp(&raw), Some(expected), "{raw:?}");
        }
        assert_eq!(parse_timestamp(&RawTimestamp::Text("yesterday".into())), None);
    }

    #[test]
    fn list_shapes() {
        assert_eq!(list_payload(json!([1, 2]), "events").map(|v| v.len()), Some(2));
        assert_eq!(
            list_payload(json!({ "events": [1] }), "events").map(|v| v.len()),
            Some(1)
        );
        assert_eq!(list_payload(json!({ "items": [1] }), "events"), None);
        assert_eq!(list_payload(json!({ "events": "nope" }), "events"), None);
        assert_eq!(list_payload(Value::Null, "events"), None);
    }

    #[test]
    fn decode_list_skips_bad_items_and_bad_shapes() {
        let events: Vec<BackendEvent> = decode_list(
            json!({ "events": [{ "event_id": 1 }, { "event_id": "oops" }, {}] }),
            "events",
        );
        assert_eq!(events.len(), 2);

        let events: Vec<BackendEvent> = decode_list(json!({ "message": "ok" }), "events");
        assert!(events.is_empty());
    }

    #[test]
    fn wrapped_objects_are_unwrapped() {
        assert_eq!(
            object_payload(json!({ "event": { "event_id": 1 } }), "event"),
            json!({ "event_id": 1 })
        );
        assert_eq!(
            object_payload(json!({ "event_id": 1 }), "event"),
            json!({ "event_id": 1 })
        );
    }

    #[test]
    fn user_defaults_from_role_and_email() {
        let raw = BackendUser {
            id: Some(5),
            email: Some("ada@campus.edu".into()),
            ..Default::default()
        };
        let user = normalize_user(raw, Role::Org).value;
        assert_eq!(user.id, "5");
        assert_eq!(user.username, "ada");
        assert_eq!(user.display_name, "ada");
        assert_eq!(user.user_type, Role::Org);
        assert!(user.is_organization);
    }

    #[test]
    fn comment_and_attendee_defaults() {
        let comment = normalize_comment(
            BackendComment {
                comment_id: Some(1),
                event_id: Some(2),
                upvotes: Some(-3),
                user_vote: Some("down".into()),
                ..Default::default()
            },
            NOW,
        )
        .value;
        assert_eq!(comment.username, "Anonymous");
        assert_eq!(comment.upvotes, 0);
        assert_eq!(comment.user_vote, Some(Vote::Down));

        let attendee = normalize_attendee(
            BackendAttendee {
                student_id: Some(9),
                name: Some("Grace".into()),
                email: Some("grace@campus.edu".into()),
                ..Default::default()
            },
            "4",
            NOW,
        )
        .value;
        assert_eq!(attendee.id, "4-9");
        assert_eq!(attendee.event_id, "4");
        assert_eq!(attendee.username, "grace");
        assert_eq!(attendee.display_name, "Grace");
        assert!(!attendee.is_confirmed);
        assert_eq!(attendee.registered_at, NOW);
    }

    #[test]
    fn wristband_without_expiry_is_expired() {
        let normalized = normalize_wristband(
            BackendWristband {
                wristband_id: Some(1),
                event_id: Some(2),
                student_id: Some(3),
                code: Some("PU-123".into()),
                created_at: Some(RawTimestamp::Text("2024-12-25T18:00:00Z".into())),
                expires_at: None,
            },
            NOW,
        );
        assert_eq!(normalized.defaulted, vec!["expires_at"]);
        assert!(normalized.value.is_expired(datetime!(2024-12-25 18:01 UTC)));
    }
}
