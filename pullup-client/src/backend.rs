use crate::domain::{
    Attendee, Comment, Credentials, Event, EventFilters, EventUpdate, NewEvent, ProfileUpdate,
    QrWristband, Registration, Session, User, Vote, WristbandValidation,
};
use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

#[async_trait]
pub trait EventService: Send + Sync {
    async fn events(&self, filters: &EventFilters) -> Result<Vec<Event>>;

    async fn event(&self, id: &str) -> Result<Event>;

    /// Register when `currently_registered` is false, unregister otherwise. The returned event
    /// reflects the new state.
    async fn toggle_pull_up(
        &self,
        id: &str,
        currently_registered: bool,
        password: Option<&str>,
    ) -> Result<Event>;

    /// Events the logged in student has pulled up to.
    async fn user_events(&self) -> Result<Vec<Event>>;

    /// Events created by the logged in organization.
    async fn organization_events(&self) -> Result<Vec<Event>>;

    async fn create_event(&self, event: &NewEvent) -> Result<Event>;

    async fn update_event(&self, id: &str, update: &EventUpdate) -> Result<Event>;

    async fn delete_event(&self, id: &str) -> Result<()>;

    async fn event_attendees(&self, id: &str) -> Result<Vec<Attendee>>;

    async fn update_attendee_registration(
        &self,
        event_id: &str,
        student_id: &str,
        is_confirmed: bool,
    ) -> Result<Attendee>;

    async fn toggle_saved(&self, id: &str) -> Result<Event>;

    async fn toggle_like(&self, id: &str) -> Result<Event>;
}

#[async_trait]
pub trait CommentService: Send + Sync {
    async fn comments(&self, event_id: &str) -> Result<Vec<Comment>>;

    async fn add_comment(&self, event_id: &str, text: &str) -> Result<Comment>;

    async fn toggle_comment_vote(&self, comment_id: &str, vote: Vote) -> Result<Comment>;
}

#[async_trait]
pub trait WristbandService: Send + Sync {
    async fn generate_wristband(&self, event_id: &str) -> Result<QrWristband>;

    async fn validate_wristband(&self, code: &str) -> Result<WristbandValidation>;

    async fn wristbands(&self) -> Result<Vec<QrWristband>>;
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<Session>;

    async fn register(&self, registration: &Registration) -> Result<Session>;

    async fn cas_login(&self, ticket: &str) -> Result<Session>;

    async fn logout(&self) -> Result<()>;

    async fn current_user(&self) -> Result<User>;

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User>;
}

/// Everything a screen can ask of a backend. Both the mock and the http implementation provide
/// the whole set.
pub trait Backend: EventService + CommentService + WristbandService + AuthService {
    fn kind(&self) -> BackendKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Real,
    Mock,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "real" | "http" => Ok(BackendKind::Real),
            "mock" => Ok(BackendKind::Mock),
            other => Err(format!("unknown backend '{other}', expected 'real' or 'mock'")),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Real => write!(f, "real"),
            BackendKind::Mock => write!(f, "mock"),
        }
    }
}
