use crate::backend::{Backend, BackendKind};
use crate::domain::{
    Attendee, Comment, Credentials, Event, EventFilters, EventUpdate, NewEvent, ProfileUpdate,
    QrWristband, Registration, Session, User, Vote, WristbandValidation,
};
use crate::error::{ApiError, Result};
use crate::http::HttpClient;
use crate::mock::{MockBackend, MockLatency};
use crate::real::RealBackend;
use crate::sequence::{Latest, RequestSequencer};
use crate::session::{self, UnverifiedClaims};
use crate::settings::Settings;
use crate::token_store::TokenStore;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The single entry point screens talk to. Which backend sits behind it is decided once, when
/// the provider is built, and callers cannot tell the difference.
#[derive(Clone)]
pub struct ApiProvider {
    backend: Arc<dyn Backend>,
    tokens: Arc<dyn TokenStore>,
    sequencer: Arc<RequestSequencer>,
}

impl ApiProvider {
    pub fn new(backend: Arc<dyn Backend>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            backend,
            tokens,
            sequencer: Arc::new(RequestSequencer::new()),
        }
    }

    pub fn real(base_url: &str, timeout: Duration, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let http = HttpClient::new(base_url, timeout, tokens.clone())?;
        Ok(Self::new(Arc::new(RealBackend::new(http)), tokens))
    }

    pub fn mock(latency: MockLatency, tokens: Arc<dyn TokenStore>) -> Self {
        Self::new(Arc::new(MockBackend::new(latency)), tokens)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let tokens: Arc<dyn TokenStore> = Arc::new(settings.token_store());

        let provider = match settings.backend {
            BackendKind::Real => {
                Self::real(&settings.server_address, settings.timeout(), tokens)?
            }
            BackendKind::Mock => Self::mock(settings.latency(), tokens),
        };

        info!(backend = %provider.kind(), "api provider ready");
        Ok(provider)
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn is_logged_in(&self) -> bool {
        self.tokens.token().is_some()
    }

    /// Role and id read from the stored token. Not checked by anyone; see [`session`].
    pub fn claims(&self) -> Result<UnverifiedClaims> {
        session::current_claims(self.tokens.as_ref())
    }

    /// Run `request` as the newest request under `key`. If another request for the same key is
    /// started before this one finishes, this one resolves to [`Latest::Superseded`] and its
    /// result, error or not, is dropped.
    pub async fn latest<T, F>(&self, key: &str, request: F) -> Result<Latest<T>>
    where
        F: Future<Output = Result<T>>,
    {
        let ticket = self.sequencer.issue(key);
        let res = request.await;

        if !self.sequencer.is_latest(&ticket) {
            debug!(key, seq = ticket.seq(), "dropping superseded response");
            return Ok(Latest::Superseded);
        }

        res.map(Latest::Current)
    }

    pub async fn events(&self, filters: &EventFilters) -> Result<Vec<Event>> {
        self.backend.events(filters).await
    }

    /// `None` when there is no such event.
    pub async fn event(&self, id: &str) -> Result<Option<Event>> {
        match self.backend.event(id).await {
            Ok(event) => Ok(Some(event)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn toggle_pull_up(
        &self,
        id: &str,
        currently_registered: bool,
        password: Option<&str>,
    ) -> Result<Event> {
        self.backend
            .toggle_pull_up(id, currently_registered, password)
            .await
    }

    pub async fn user_events(&self) -> Result<Vec<Event>> {
        self.backend.user_events().await
    }

    pub async fn organization_events(&self) -> Result<Vec<Event>> {
        self.backend.organization_events().await
    }

    pub async fn create_event(&self, event: &NewEvent) -> Result<Event> {
        if event.is_private && event.event_password.as_deref().map_or(true, str::is_empty) {
            return Err(ApiError::InvalidInput(
                "A private event needs a password".into(),
            ));
        }
        self.backend.create_event(event).await
    }

    pub async fn update_event(&self, id: &str, update: &EventUpdate) -> Result<Event> {
        self.backend.update_event(id, update).await
    }

    pub async fn delete_event(&self, id: &str) -> Result<()> {
        self.backend.delete_event(id).await
    }

    pub async fn event_attendees(&self, id: &str) -> Result<Vec<Attendee>> {
        self.backend.event_attendees(id).await
    }

    pub async fn update_attendee_registration(
        &self,
        event_id: &str,
        student_id: &str,
        is_confirmed: bool,
    ) -> Result<Attendee> {
        self.backend
            .update_attendee_registration(event_id, student_id, is_confirmed)
            .await
    }

    pub async fn toggle_saved(&self, id: &str) -> Result<Event> {
        self.backend.toggle_saved(id).await
    }

    #[deprecated(note = "likes became pull ups, use `toggle_pull_up`")]
    pub async fn toggle_like(&self, id: &str) -> Result<Event> {
        warn!("toggle_like is deprecated, use toggle_pull_up");
        self.backend.toggle_like(id).await
    }

    pub async fn comments(&self, event_id: &str) -> Result<Vec<Comment>> {
        self.backend.comments(event_id).await
    }

    pub async fn add_comment(&self, event_id: &str, text: &str) -> Result<Comment> {
        self.backend.add_comment(event_id, text).await
    }

    pub async fn toggle_comment_vote(&self, comment_id: &str, vote: Vote) -> Result<Comment> {
        self.backend.toggle_comment_vote(comment_id, vote).await
    }

    pub async fn generate_wristband(&self, event_id: &str) -> Result<QrWristband> {
        self.backend.generate_wristband(event_id).await
    }

    pub async fn validate_wristband(&self, code: &str) -> Result<WristbandValidation> {
        self.backend.validate_wristband(code).await
    }

    pub async fn wristbands(&self) -> Result<Vec<QrWristband>> {
        self.backend.wristbands().await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let session = self.backend.login(credentials).await?;
        self.tokens.set_token(&session.token);
        Ok(session)
    }

    pub async fn register(&self, registration: &Registration) -> Result<Session> {
        let session = self.backend.register(registration).await?;
        self.tokens.set_token(&session.token);
        Ok(session)
    }

    pub async fn cas_login(&self, ticket: &str) -> Result<Session> {
        let session = self.backend.cas_login(ticket).await?;
        self.tokens.set_token(&session.token);
        Ok(session)
    }

    /// The local token goes away whether or not the server heard about it.
    pub async fn logout(&self) -> Result<()> {
        let res = self.backend.logout().await;
        self.tokens.remove_token();

        if let Err(e) = res {
            warn!("server side logout failed: {e}");
        }
        Ok(())
    }

    pub async fn current_user(&self) -> Result<User> {
        self.backend.current_user().await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        self.backend.update_profile(update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token_store::MemoryTokenStore;
    use pullup_common::domain::Role;

    fn provider() -> ApiProvider {
        ApiProvider::mock(MockLatency::none(), Arc::new(MemoryTokenStore::new()))
    }

    #[tokio::test]
    async fn missing_event_is_none() {
        let api = provider();
        assert!(api.event("404").await.unwrap().is_none());
        assert!(api.event("1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn login_persists_token_and_logout_clears_it() {
        let api = provider();
        let session = api
            .login(&Credentials {
                role: Role::Student,
                email: "johndoe@campus.edu".into(),
                password: crate::fixtures::MOCK_PASSWORD.into(),
            })
            .await
            .unwrap();

        assert_eq!(api.tokens().token(), Some(session.token));
        assert_eq!(api.claims().unwrap().actor_id, 101);

        api.logout().await.unwrap();
        assert!(!api.is_logged_in());
    }

    #[tokio::test]
    async fn private_event_without_password_is_rejected() {
        let api = provider();
        let res = api
            .create_event(&NewEvent {
                title: "Secret".into(),
                description: String::new(),
                location: String::new(),
                date_time: time::macros::datetime!(2031-01-01 20:00),
                image_url: None,
                is_private: true,
                event_password: None,
            })
            .await;
        assert!(matches!(res, Err(ApiError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn only_the_newest_request_lands() {
        let api = provider();

        let slow = api.latest("search", async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok("first")
        });
        let fast = api.latest("search", async { Ok("second") });

        let (slow, fast) = tokio::join!(slow, fast);
        assert_eq!(slow.unwrap(), Latest::Superseded);
        assert_eq!(fast.unwrap(), Latest::Current("second"));
    }

    #[tokio::test]
    async fn superseded_errors_are_dropped_too() {
        let api = provider();

        let slow = api.latest("events", async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Err::<(), _>(ApiError::NotLoggedIn)
        });
        let fast = api.latest("events", async { Ok(()) });

        let (slow, fast) = tokio::join!(slow, fast);
        assert!(slow.unwrap().is_superseded());
        assert!(fast.is_ok());
    }

    #[tokio::test]
    #[allow(deprecated)]
    async fn like_is_a_pull_up() {
        let api = provider();
        let before = api.event("4").await.unwrap().unwrap();
        let liked = api.toggle_like("4").await.unwrap();
        assert_eq!(liked.pull_up_count, before.pull_up_count + 1);
        assert!(liked.user_pulled_up);
    }
}
