use time::{OffsetDateTime, PrimitiveDateTime};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub organizer_id: String,
    pub organizer_name: String,
    pub organizer_image_url: Option<String>,
    pub location: String,
    /// Local wall-clock time of the event. The backend sends no zone.
    pub date_time: PrimitiveDateTime,
    pub image_url: String,
    pub is_private: bool,
    pub pull_up_count: u32,
    pub user_pulled_up: bool,
    /// Only ever set on private events, and only visible to the organizer.
    pub event_password: Option<String>,
    pub created_at: OffsetDateTime,
}

impl Event {
    /// Flip the viewer's participation and keep the counter in step.
    pub fn toggle_pull_up(&mut self) {
        if self.user_pulled_up {
            self.pull_up_count = self.pull_up_count.saturating_sub(1);
            self.user_pulled_up = false;
        } else {
            self.pull_up_count += 1;
            self.user_pulled_up = true;
        }
    }

    /// A private event asks for the passcode unless the caller organizes it.
    pub fn requires_password_from(&self, actor_id: &str) -> bool {
        self.is_private && self.event_password.is_some() && self.organizer_id != actor_id
    }
}

/// Input for creating an event. The organizer comes from the session.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date_time: PrimitiveDateTime,
    pub image_url: Option<String>,
    pub is_private: bool,
    pub event_password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date_time: Option<PrimitiveDateTime>,
    pub image_url: Option<String>,
    pub is_private: Option<bool>,
    pub event_password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilters {
    pub is_private: Option<bool>,
    pub organization_id: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl EventFilters {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![];
        if let Some(v) = self.is_private {
            pairs.push(("is_private", v.to_string()));
        }
        if let Some(v) = &self.organization_id {
            pairs.push(("organization_id", v.clone()));
        }
        if let Some(v) = self.limit {
            pairs.push(("limit", v.to_string()));
        }
        if let Some(v) = self.offset {
            pairs.push(("offset", v.to_string()));
        }
        pairs
    }

    /// Applied locally by the mock backend; the real backend filters server side.
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(v) = self.is_private {
            if event.is_private != v {
                return false;
            }
        }
        if let Some(v) = &self.organization_id {
            if &event.organizer_id != v {
                return false;
            }
        }
        true
    }
}
