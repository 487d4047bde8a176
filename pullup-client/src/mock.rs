use crate::backend::{AuthService, Backend, BackendKind, CommentService, EventService, WristbandService};
use crate::domain::{
    Attendee, Comment, Credentials, Event, EventFilters, EventUpdate, NewEvent, ProfileUpdate,
    QrWristband, Registration, Session, User, Vote, WristbandValidation,
};
use crate::error::{ApiError, Result};
use crate::fixtures::{self, MockAccount};
use crate::normalize::{local_now, PLACEHOLDER_IMAGE};
use crate::session::mock_token;
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use pullup_common::domain::Role;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// How long a generated wristband stays valid.
pub const WRISTBAND_LIFETIME: time::Duration = time::Duration::hours(24);

/// Artificial delays so screens can be exercised against realistic loading states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLatency {
    pub events: Duration,
    pub lookup: Duration,
    pub toggle: Duration,
    pub listing: Duration,
    pub create: Duration,
}

impl Default for MockLatency {
    fn default() -> Self {
        Self {
            events: Duration::from_millis(500),
            lookup: Duration::from_millis(300),
            toggle: Duration::from_millis(200),
            listing: Duration::from_millis(400),
            create: Duration::from_millis(800),
        }
    }
}

impl MockLatency {
    pub fn none() -> Self {
        Self {
            events: Duration::ZERO,
            lookup: Duration::ZERO,
            toggle: Duration::ZERO,
            listing: Duration::ZERO,
            create: Duration::ZERO,
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

struct MockState {
    accounts: Vec<MockAccount>,
    events: Vec<Event>,
    attendees: Vec<Attendee>,
    comments: Vec<Comment>,
    wristbands: Vec<QrWristband>,
    current: Option<String>,
    next_id: u64,
}

impl MockState {
    fn seeded(now: OffsetDateTime) -> Self {
        let accounts = fixtures::accounts();
        let events = fixtures::events(now);

        // Whoever the fixtures have already pulled up shows up in the attendee list.
        let attendees = events
            .iter()
            .filter(|e| e.user_pulled_up)
            .filter_map(|e| {
                let student = accounts.iter().find(|a| a.user.user_type == Role::Student)?;
                Some(attendee(e, &student.user, now))
            })
            .collect();

        Self {
            accounts,
            events,
            attendees,
            comments: fixtures::comments(now),
            wristbands: vec![],
            current: None,
            next_id: 1000,
        }
    }

    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    /// The logged in account, or the first organization when nobody logged in.
    fn current(&self) -> Result<&MockAccount> {
        let found = match &self.current {
            Some(id) => self.accounts.iter().find(|a| &a.user.id == id),
            None => self.accounts.iter().find(|a| a.user.is_organization),
        };
        found.ok_or(ApiError::NotLoggedIn)
    }

    fn current_user(&self) -> Result<User> {
        Ok(self.current()?.user.clone())
    }

    fn event_mut(&mut self, id: &str) -> Result<&mut Event> {
        self.events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ApiError::not_found("Event"))
    }

    fn event(&self, id: &str) -> Result<&Event> {
        self.events
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| ApiError::not_found("Event"))
    }

    fn log_in(&mut self, id: &str) -> Result<Session> {
        self.current = Some(id.to_string());
        let user = self.current_user()?;
        let actor_id = user.id.parse::<i64>().unwrap_or_default();
        Ok(Session {
            token: mock_token(user.user_type, actor_id, local_now().unix_timestamp()),
            user: Some(user),
        })
    }
}

fn attendee(event: &Event, user: &User, now: OffsetDateTime) -> Attendee {
    Attendee {
        id: format!("{}-{}", event.id, user.id),
        event_id: event.id.clone(),
        user_id: user.id.clone(),
        username: user.username.clone(),
        display_name: user.display_name.clone(),
        is_confirmed: false,
        registered_at: now,
    }
}

/// In-memory stand in for the backend. Mutations change the seeded data in place so a later
/// read sees them.
pub struct MockBackend {
    state: Mutex<MockState>,
    latency: MockLatency,
}

impl MockBackend {
    pub fn new(latency: MockLatency) -> Self {
        Self {
            state: Mutex::new(MockState::seeded(local_now())),
            latency,
        }
    }

    pub fn without_latency() -> Self {
        Self::new(MockLatency::none())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new(MockLatency::default())
    }
}

#[async_trait]
impl EventService for MockBackend {
    async fn events(&self, filters: &EventFilters) -> Result<Vec<Event>> {
        pause(self.latency.events).await;
        let state = self.state.lock().await;

        let offset = filters.offset.unwrap_or(0) as usize;
        let limit = filters.limit.map(|v| v as usize).unwrap_or(usize::MAX);

        Ok(state
            .events
            .iter()
            .filter(|e| filters.matches(e))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn event(&self, id: &str) -> Result<Event> {
        pause(self.latency.lookup).await;
        let state = self.state.lock().await;
        state.event(id).cloned()
    }

    async fn toggle_pull_up(
        &self,
        id: &str,
        currently_registered: bool,
        password: Option<&str>,
    ) -> Result<Event> {
        pause(self.latency.toggle).await;
        let mut state = self.state.lock().await;
        let user = state.current_user()?;
        let now = local_now();

        let event = state.event_mut(id)?;
        match (currently_registered, event.user_pulled_up) {
            (false, true) => return Err(ApiError::AlreadyRegistered),
            (true, false) => return Err(ApiError::not_found("Registration")),
            _ => {}
        }

        if !currently_registered
            && event.requires_password_from(&user.id)
            && password != event.event_password.as_deref()
        {
            return Err(ApiError::WrongPassword);
        }

        event.toggle_pull_up();
        let event = event.clone();
        debug!(event = %event.id, pulled_up = event.user_pulled_up, "mock pull up toggled");

        if event.user_pulled_up {
            state.attendees.push(attendee(&event, &user, now));
        } else {
            state
                .attendees
                .retain(|a| !(a.event_id == event.id && a.user_id == user.id));
        }

        Ok(event)
    }

    async fn user_events(&self) -> Result<Vec<Event>> {
        pause(self.latency.listing).await;
        let state = self.state.lock().await;
        Ok(state
            .events
            .iter()
            .filter(|e| e.user_pulled_up)
            .cloned()
            .collect())
    }

    async fn organization_events(&self) -> Result<Vec<Event>> {
        pause(self.latency.listing).await;
        let state = self.state.lock().await;
        let user = state.current_user()?;
        if !user.is_organization {
            return Ok(vec![]);
        }

        Ok(state
            .events
            .iter()
            .filter(|e| e.organizer_id == user.id)
            .cloned()
            .collect())
    }

    async fn create_event(&self, new: &NewEvent) -> Result<Event> {
        pause(self.latency.create).await;
        if new.title.trim().is_empty() {
            return Err(ApiError::InvalidInput("An event needs a title".into()));
        }

        let mut state = self.state.lock().await;
        let user = state.current_user()?;
        if !user.is_organization {
            return Err(ApiError::WrongRole {
                required: Role::Org,
                found: user.user_type,
            });
        }

        let event = Event {
            id: state.next_id(),
            title: new.title.clone(),
            description: new.description.clone(),
            organizer_id: user.id.clone(),
            organizer_name: user.display_name.clone(),
            organizer_image_url: user.profile_image_url.clone(),
            location: new.location.clone(),
            date_time: new.date_time,
            image_url: new
                .image_url
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            is_private: new.is_private,
            pull_up_count: 0,
            user_pulled_up: false,
            event_password: new.event_password.clone().filter(|_| new.is_private),
            created_at: local_now(),
        };

        state.events.push(event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: &str, update: &EventUpdate) -> Result<Event> {
        pause(self.latency.create).await;
        let mut state = self.state.lock().await;
        let event = state.event_mut(id)?;

        if let Some(v) = &update.title {
            event.title = v.clone();
        }
        if let Some(v) = &update.description {
            event.description = v.clone();
        }
        if let Some(v) = &update.location {
            event.location = v.clone();
        }
        if let Some(v) = update.date_time {
            event.date_time = v;
        }
        if let Some(v) = &update.image_url {
            event.image_url = v.clone();
        }
        if let Some(v) = update.is_private {
            event.is_private = v;
        }
        if let Some(v) = &update.event_password {
            event.event_password = Some(v.clone());
        }
        if !event.is_private {
            event.event_password = None;
        }

        Ok(event.clone())
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        pause(self.latency.toggle).await;
        let mut state = self.state.lock().await;
        state.event(id)?;

        state.events.retain(|e| e.id != id);
        state.attendees.retain(|a| a.event_id != id);
        state.comments.retain(|c| c.event_id != id);
        state.wristbands.retain(|w| w.event_id != id);
        Ok(())
    }

    async fn event_attendees(&self, id: &str) -> Result<Vec<Attendee>> {
        pause(self.latency.listing).await;
        let state = self.state.lock().await;
        state.event(id)?;

        Ok(state
            .attendees
            .iter()
            .filter(|a| a.event_id == id)
            .cloned()
            .collect())
    }

    async fn update_attendee_registration(
        &self,
        event_id: &str,
        student_id: &str,
        is_confirmed: bool,
    ) -> Result<Attendee> {
        pause(self.latency.toggle).await;
        let mut state = self.state.lock().await;

        let attendee = state
            .attendees
            .iter_mut()
            .find(|a| a.event_id == event_id && a.user_id == student_id)
            .ok_or_else(|| ApiError::not_found("Registration"))?;
        attendee.is_confirmed = is_confirmed;
        Ok(attendee.clone())
    }

    /// Saving is not tracked here. The event comes back unchanged.
    async fn toggle_saved(&self, id: &str) -> Result<Event> {
        pause(self.latency.toggle).await;
        let state = self.state.lock().await;
        state.event(id).cloned()
    }

    async fn toggle_like(&self, id: &str) -> Result<Event> {
        // Likes never asked for a passcode.
        let (currently, password) = {
            let state = self.state.lock().await;
            let event = state.event(id)?;
            (event.user_pulled_up, event.event_password.clone())
        };
        self.toggle_pull_up(id, currently, password.as_deref()).await
    }
}

#[async_trait]
impl CommentService for MockBackend {
    async fn comments(&self, event_id: &str) -> Result<Vec<Comment>> {
        pause(self.latency.lookup).await;
        let state = self.state.lock().await;
        state.event(event_id)?;

        Ok(state
            .comments
            .iter()
            .filter(|c| c.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn add_comment(&self, event_id: &str, text: &str) -> Result<Comment> {
        pause(self.latency.toggle).await;
        if text.trim().is_empty() {
            return Err(ApiError::InvalidInput("A comment cannot be empty".into()));
        }

        let mut state = self.state.lock().await;
        state.event(event_id)?;
        let user = state.current_user()?;

        let comment = Comment {
            id: state.next_id(),
            event_id: event_id.to_string(),
            user_id: user.id,
            username: user.username,
            user_image_url: user.profile_image_url,
            text: text.trim().to_string(),
            created_at: local_now(),
            upvotes: 0,
            downvotes: 0,
            user_vote: None,
        };

        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn toggle_comment_vote(&self, comment_id: &str, vote: Vote) -> Result<Comment> {
        pause(self.latency.toggle).await;
        let mut state = self.state.lock().await;

        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| ApiError::not_found("Comment"))?;
        comment.toggle_vote(vote);
        Ok(comment.clone())
    }
}

fn wristband_code(event_id: &str, user_id: &str) -> String {
    let raw = format!("pullup:{event_id}:{user_id}:{}", Uuid::new_v4().simple());
    URL_SAFE_NO_PAD.encode(raw)
}

#[async_trait]
impl WristbandService for MockBackend {
    async fn generate_wristband(&self, event_id: &str) -> Result<QrWristband> {
        pause(self.latency.lookup).await;
        let mut state = self.state.lock().await;
        state.event(event_id)?;
        let user = state.current_user()?;
        let now = local_now();

        // One live wristband per event and holder.
        if let Some(existing) = state
            .wristbands
            .iter()
            .find(|w| w.event_id == event_id && w.user_id == user.id && !w.is_expired(now))
        {
            return Ok(existing.clone());
        }

        let wristband = QrWristband {
            id: state.next_id(),
            event_id: event_id.to_string(),
            code: wristband_code(event_id, &user.id),
            user_id: user.id,
            created_at: now,
            expires_at: now + WRISTBAND_LIFETIME,
        };

        state.wristbands.push(wristband.clone());
        Ok(wristband)
    }

    async fn validate_wristband(&self, code: &str) -> Result<WristbandValidation> {
        pause(self.latency.lookup).await;
        let state = self.state.lock().await;

        let Some(wristband) = state.wristbands.iter().find(|w| w.code == code.trim()) else {
            return Ok(WristbandValidation {
                is_valid: false,
                event_id: None,
                user_id: None,
                message: Some("Unknown wristband".into()),
            });
        };

        let expired = wristband.is_expired(local_now());
        Ok(WristbandValidation {
            is_valid: !expired,
            event_id: Some(wristband.event_id.clone()),
            user_id: Some(wristband.user_id.clone()),
            message: expired.then(|| "Wristband expired".to_string()),
        })
    }

    async fn wristbands(&self) -> Result<Vec<QrWristband>> {
        pause(self.latency.listing).await;
        let state = self.state.lock().await;
        let user = state.current_user()?;

        Ok(state
            .wristbands
            .iter()
            .filter(|w| w.user_id == user.id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AuthService for MockBackend {
    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        pause(self.latency.lookup).await;
        let mut state = self.state.lock().await;

        let id = state
            .accounts
            .iter()
            .find(|a| {
                a.user.user_type == credentials.role
                    && a.email.eq_ignore_ascii_case(credentials.email.trim())
                    && a.password == credentials.password
            })
            .map(|a| a.user.id.clone())
            .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".into()))?;

        state.log_in(&id)
    }

    async fn register(&self, registration: &Registration) -> Result<Session> {
        pause(self.latency.create).await;
        let mut state = self.state.lock().await;

        let email = registration.email.trim();
        if state
            .accounts
            .iter()
            .any(|a| a.email.eq_ignore_ascii_case(email))
        {
            return Err(ApiError::BadRequest("Email already in use".into()));
        }

        let id = state.next_id();
        let username = email.split('@').next().unwrap_or(email).to_string();
        state.accounts.push(MockAccount {
            user: User {
                id: id.clone(),
                username,
                display_name: registration.name.clone(),
                is_organization: registration.role == Role::Org,
                profile_image_url: None,
                user_type: registration.role,
            },
            email: email.to_string(),
            password: registration.password.clone(),
        });

        state.log_in(&id)
    }

    async fn cas_login(&self, ticket: &str) -> Result<Session> {
        pause(self.latency.lookup).await;
        if ticket.trim().is_empty() {
            return Err(ApiError::Unauthorized("Missing CAS ticket".into()));
        }

        let mut state = self.state.lock().await;
        let id = state
            .accounts
            .iter()
            .find(|a| a.user.user_type == Role::Student)
            .map(|a| a.user.id.clone())
            .ok_or(ApiError::NotLoggedIn)?;

        state.log_in(&id)
    }

    async fn logout(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.current = None;
        Ok(())
    }

    async fn current_user(&self) -> Result<User> {
        pause(self.latency.lookup).await;
        self.state.lock().await.current_user()
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        pause(self.latency.toggle).await;
        let mut state = self.state.lock().await;
        let id = state.current()?.user.id.clone();

        let account = state
            .accounts
            .iter_mut()
            .find(|a| a.user.id == id)
            .ok_or(ApiError::NotLoggedIn)?;

        if let Some(v) = &update.username {
            account.user.username = v.clone();
        }
        if let Some(v) = &update.email {
            account.email = v.clone();
        }
        if let Some(v) = &update.display_name {
            account.user.display_name = v.clone();
        }
        if let Some(v) = &update.profile_image_url {
            account.user.profile_image_url = Some(v.clone());
        }

        Ok(account.user.clone())
    }
}

impl Backend for MockBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Mock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::MOCK_PASSWORD;

    fn backend() -> MockBackend {
        MockBackend::without_latency()
    }

    #[tokio::test]
    async fn nobody_logged_in_acts_as_first_organization() {
        let mock = backend();
        let user = mock.current_user().await.unwrap();
        assert!(user.is_organization);
        assert_eq!(user.id, "1");
    }

    #[tokio::test]
    async fn pull_up_changes_are_visible_to_later_reads() {
        let mock = backend();

        let before = mock.event("3").await.unwrap();
        let after = mock.toggle_pull_up("3", false, None).await.unwrap();
        assert!(after.user_pulled_up);
        assert_eq!(after.pull_up_count, before.pull_up_count + 1);

        let read = mock.event("3").await.unwrap();
        assert_eq!(read, after);
        assert!(mock
            .user_events()
            .await
            .unwrap()
            .iter()
            .any(|e| e.id == "3"));

        let back = mock.toggle_pull_up("3", true, None).await.unwrap();
        assert!(!back.user_pulled_up);
        assert_eq!(back.pull_up_count, before.pull_up_count);
    }

    #[tokio::test]
    async fn toggle_reports_state_mismatches() {
        let mock = backend();
        assert!(matches!(
            mock.toggle_pull_up("1", false, None).await,
            Err(ApiError::AlreadyRegistered)
        ));
        assert!(matches!(
            mock.toggle_pull_up("3", true, None).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn private_event_checks_password() {
        let mock = backend();
        mock.login(&Credentials {
            role: Role::Student,
            email: "johndoe@campus.edu".into(),
            password: MOCK_PASSWORD.into(),
        })
        .await
        .unwrap();

        assert!(matches!(
            mock.toggle_pull_up("2", false, Some("nope")).await,
            Err(ApiError::WrongPassword)
        ));
        let event = mock.toggle_pull_up("2", false, Some("summit")).await.unwrap();
        assert!(event.user_pulled_up);
        assert_eq!(mock.event_attendees("2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn organizer_skips_own_password() {
        let mock = backend();
        mock.login(&Credentials {
            role: Role::Org,
            email: "outdoors@campus.edu".into(),
            password: MOCK_PASSWORD.into(),
        })
        .await
        .unwrap();

        assert!(mock.toggle_pull_up("2", false, None).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_event() {
        let mock = backend();
        assert!(mock.event("nope").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn create_then_list_for_organization() {
        let mock = backend();
        let created = mock
            .create_event(&NewEvent {
                title: "Robot Fight".into(),
                description: String::new(),
                location: "Gym".into(),
                date_time: time::macros::datetime!(2031-03-01 18:00),
                image_url: None,
                is_private: false,
                event_password: Some("ignored".into()),
            })
            .await
            .unwrap();

        assert_eq!(created.organizer_id, "1");
        assert_eq!(created.image_url, PLACEHOLDER_IMAGE);
        assert_eq!(created.event_password, None);

        let mine = mock.organization_events().await.unwrap();
        assert!(mine.iter().any(|e| e.id == created.id));

        mock.delete_event(&created.id).await.unwrap();
        assert!(mock.event(&created.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn students_cannot_create_events() {
        let mock = backend();
        mock.cas_login("ST-1").await.unwrap();
        let res = mock
            .create_event(&NewEvent {
                title: "Nope".into(),
                description: String::new(),
                location: String::new(),
                date_time: time::macros::datetime!(2031-03-01 18:00),
                image_url: None,
                is_private: false,
                event_password: None,
            })
            .await;
        assert!(matches!(res, Err(ApiError::WrongRole { .. })));
    }

    #[tokio::test]
    async fn comment_votes_toggle() {
        let mock = backend();
        let comment = mock.add_comment("3", "  see you there ").await.unwrap();
        assert_eq!(comment.text, "see you there");

        let up = mock.toggle_comment_vote(&comment.id, Vote::Up).await.unwrap();
        assert_eq!((up.upvotes, up.user_vote), (1, Some(Vote::Up)));
        let down = mock
            .toggle_comment_vote(&comment.id, Vote::Down)
            .await
            .unwrap();
        assert_eq!((down.upvotes, down.downvotes), (0, 1));
        let none = mock
            .toggle_comment_vote(&comment.id, Vote::Down)
            .await
            .unwrap();
        assert_eq!((none.downvotes, none.user_vote), (0, None));

        assert_eq!(mock.comments("3").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn wristbands_validate() {
        let mock = backend();
        let first = mock.generate_wristband("1").await.unwrap();
        let again = mock.generate_wristband("1").await.unwrap();
        assert_eq!(first, again);

        let ok = mock.validate_wristband(&first.code).await.unwrap();
        assert!(ok.is_valid);
        assert_eq!(ok.event_id.as_deref(), Some("1"));

        let bad = mock.validate_wristband("garbage").await.unwrap();
        assert!(!bad.is_valid);
        assert_eq!(mock.wristbands().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn login_checks_credentials_and_hands_out_parseable_tokens() {
        let mock = backend();
        let bad = mock
            .login(&Credentials {
                role: Role::Student,
                email: "johndoe@campus.edu".into(),
                password: "wrong".into(),
            })
            .await;
        assert!(matches!(bad, Err(ApiError::Unauthorized(_))));
        assert_eq!(
            bad.unwrap_err().to_string(),
            "Invalid email or password"
        );

        let session = mock
            .login(&Credentials {
                role: Role::Student,
                email: "JohnDoe@campus.edu".into(),
                password: MOCK_PASSWORD.into(),
            })
            .await
            .unwrap();
        assert!(session.token.starts_with("student_101_"));
        assert_eq!(mock.current_user().await.unwrap().username, "johndoe");

        mock.logout().await.unwrap();
        assert!(mock.current_user().await.unwrap().is_organization);
    }

    #[tokio::test]
    async fn register_rejects_taken_email() {
        let mock = backend();
        let reg = Registration {
            role: Role::Student,
            name: "Jane".into(),
            email: "janesmith@campus.edu".into(),
            password: "x".into(),
            description: None,
        };
        assert!(matches!(
            mock.register(&reg).await,
            Err(ApiError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn empty_cas_ticket_says_so() {
        let err = backend().cas_login("  ").await.unwrap_err();
        assert_eq!(err.to_string(), "Missing CAS ticket");
    }

    #[tokio::test]
    async fn update_event_persists_changes() {
        let mock = backend();
        let update = EventUpdate {
            title: Some("Moonrise Hike".into()),
            location: Some("South Trailhead".into()),
            ..Default::default()
        };

        let event = mock.update_event("2", &update).await.unwrap();
        assert_eq!(event.title, "Moonrise Hike");
        assert!(event.is_private);
        assert_eq!(event.event_password.as_deref(), Some("summit"));

        let reread = mock.event("2").await.unwrap();
        assert_eq!(reread.title, "Moonrise Hike");
        assert_eq!(reread.location, "South Trailhead");
    }

    #[tokio::test]
    async fn making_an_event_public_clears_its_password() {
        let mock = backend();
        let update = EventUpdate {
            is_private: Some(false),
            event_password: Some("ignored".into()),
            ..Default::default()
        };

        let event = mock.update_event("2", &update).await.unwrap();
        assert!(!event.is_private);
        assert_eq!(event.event_password, None);
        assert!(matches!(
            mock.update_event("404", &update).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_profile_changes_the_current_user() {
        let mock = backend();
        mock.login(&Credentials {
            role: Role::Student,
            email: "janesmith@campus.edu".into(),
            password: MOCK_PASSWORD.into(),
        })
        .await
        .unwrap();

        let user = mock
            .update_profile(&ProfileUpdate {
                display_name: Some("Jane S.".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(user.display_name, "Jane S.");
        assert_eq!(user.id, "102");

        let current = mock.current_user().await.unwrap();
        assert_eq!(current.display_name, "Jane S.");
    }

    #[tokio::test]
    async fn saving_leaves_the_event_alone() {
        let mock = backend();
        let before = mock.event("3").await.unwrap();
        let after = mock.toggle_saved("3").await.unwrap();
        assert_eq!(before, after);
        assert!(mock.toggle_saved("404").await.unwrap_err().is_not_found());
    }
}
