use time::{Duration, OffsetDateTime};

/// A QR wristband for a private event.
///
/// The expiry here only drives display. Whether a code actually gets someone in is decided by the
/// validation endpoint at the door.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QrWristband {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub code: String,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl QrWristband {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now > self.expires_at
    }

    pub fn remaining(&self, now: OffsetDateTime) -> Option<Duration> {
        let diff = self.expires_at - now;
        if diff <= Duration::ZERO {
            None
        } else {
            Some(diff)
        }
    }

    /// "3h 12m remaining" or "Expired"
    pub fn remaining_label(&self, now: OffsetDateTime) -> String {
        match self.remaining(now) {
            Some(d) => format!("{}h {}m remaining", d.whole_hours(), d.whole_minutes() % 60),
            None => "Expired".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WristbandValidation {
    pub is_valid: bool,
    pub event_id: Option<String>,
    pub user_id: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn wristband() -> QrWristband {
        QrWristband {
            id: "w1".into(),
            event_id: "1".into(),
            user_id: "2".into(),
            code: "abc".into(),
            created_at: datetime!(2024-12-25 18:00 UTC),
            expires_at: datetime!(2024-12-25 23:30 UTC),
        }
    }

    #[test]
    fn remaining_time_before_expiry() {
        let w = wristband();
        let now = datetime!(2024-12-25 20:15 UTC);
        assert!(!w.is_expired(now));
        assert_eq!(w.remaining_label(now), "3h 15m remaining");
    }

    #[test]
    fn expired_after_deadline() {
        let w = wristband();
        let now = datetime!(2024-12-26 00:00 UTC);
        assert!(w.is_expired(now));
        assert_eq!(w.remaining(now), None);
        assert_eq!(w.remaining_label(now), "Expired");
    }
}
