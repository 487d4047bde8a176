use crate::backend::{AuthService, Backend, BackendKind, CommentService, EventService, WristbandService};
use crate::domain::{
    Attendee, Comment, Credentials, Event, EventFilters, EventUpdate, NewEvent, ProfileUpdate,
    QrWristband, Registration, Session, User, Vote, WristbandValidation,
};
use crate::error::{ApiError, Result};
use crate::http::HttpClient;
use crate::normalize::{
    decode_list, format_backend_date, format_backend_time, local_now, normalize_attendee,
    normalize_comment, normalize_event, normalize_user, normalize_validation,
    normalize_wristband, object_payload,
};
use crate::session;
use async_trait::async_trait;
use pullup_common::api::{
    AddCommentRequest, BackendAttendee, BackendComment, BackendEvent, BackendUser,
    BackendWristband, CasLoginRequest, CreateEventRequest, DeleteEventRequest,
    EventStudentsRequest, LoginRequest, LoginResponse, OrgCreateRequest, OrgEventsRequest,
    ProfileUpdateRequest, PullUpRequest, StudentCreateRequest, StudentEventsRequest,
    UpdateEventRequest, UpdateRegistrationRequest, ValidateWristbandRequest, VoteRequest,
    WristbandRequest, WristbandValidationResponse,
};
use pullup_common::domain::Role;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Talks to the deployed backend over http.
#[derive(Clone)]
pub struct RealBackend {
    http: HttpClient,
}

impl RealBackend {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn actor(&self, role: Role) -> Result<i64> {
        session::actor_id(self.http.tokens().as_ref(), role)
    }

    /// Role of whoever holds the token, students when it cannot be told.
    fn caller_role(&self) -> Role {
        session::current_claims(self.http.tokens().as_ref())
            .map(|c| c.role)
            .unwrap_or(Role::Student)
    }

    fn session(&self, res: LoginResponse, role: Role) -> Session {
        Session {
            user: res.user.map(|u| normalize_user(u, role).into_inner()),
            token: res.token,
        }
    }
}

fn segment(id: &str) -> String {
    urlencoding::encode(id.trim()).into_owned()
}

/// The backend keys everything by integer ids.
fn numeric_id(id: &str, what: &str) -> Result<i64> {
    id.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::InvalidInput(format!("'{id}' is not a valid {what} id")))
}

fn decode_object<T: DeserializeOwned>(value: Value, key: &str) -> Result<T> {
    serde_json::from_value(object_payload(value, key)).map_err(|e| ApiError::Decode(e.to_string()))
}

fn events_from(value: Value) -> Vec<Event> {
    let now = local_now();
    decode_list::<BackendEvent>(value, "events")
        .into_iter()
        .map(|raw| normalize_event(raw, now).into_inner())
        .collect()
}

fn event_from(value: Value) -> Result<Event> {
    let raw: BackendEvent = decode_object(value, "event")?;
    Ok(normalize_event(raw, local_now()).into_inner())
}

fn comment_from(value: Value) -> Result<Comment> {
    let raw: BackendComment = decode_object(value, "comment")?;
    Ok(normalize_comment(raw, local_now()).into_inner())
}

fn wristband_from(value: Value) -> Result<QrWristband> {
    let raw: BackendWristband = decode_object(value, "wristband")?;
    Ok(normalize_wristband(raw, local_now()).into_inner())
}

fn update_request(update: &EventUpdate) -> UpdateEventRequest {
    UpdateEventRequest {
        title: update.title.clone(),
        description: update.description.clone(),
        location: update.location.clone(),
        date: update.date_time.map(|v| format_backend_date(v.date())),
        time: update.date_time.map(|v| format_backend_time(v.time())),
        is_public: update.is_private.map(|v| !v),
        image_url: update.image_url.clone(),
        passcode: update.event_password.clone(),
    }
}

#[async_trait]
impl EventService for RealBackend {
    async fn events(&self, filters: &EventFilters) -> Result<Vec<Event>> {
        let res = if filters.is_empty() {
            self.http.get_value("/events").await?
        } else {
            self.http
                .get_query_value("/events", &filters.query_pairs())
                .await?
        };
        Ok(events_from(res))
    }

    async fn event(&self, id: &str) -> Result<Event> {
        let res = self
            .http
            .get_value(&format!("/events/{}", segment(id)))
            .await?;
        event_from(res)
    }

    async fn toggle_pull_up(
        &self,
        id: &str,
        currently_registered: bool,
        password: Option<&str>,
    ) -> Result<Event> {
        let student_id = self.actor(Role::Student)?;
        let event_id = numeric_id(id, "event")?;

        if currently_registered {
            debug!(student_id, event_id, "unregistering");
            let body = PullUpRequest {
                student_id,
                event_id,
                passcode: None,
            };
            self.http.delete_value("/students-events/pu", &body).await?;
        } else {
            debug!(student_id, event_id, "registering");
            let body = PullUpRequest {
                student_id,
                event_id,
                passcode: password.map(str::to_string),
            };
            self.http.post_value("/students-events/pu", &body).await?;
        }

        let mut event = self.event(id).await?;
        event.user_pulled_up = !currently_registered;
        Ok(event)
    }

    async fn user_events(&self) -> Result<Vec<Event>> {
        let student_id = self.actor(Role::Student)?;
        let res = self
            .http
            .post_value("/students-events/student", &StudentEventsRequest { student_id })
            .await?;

        let mut events = events_from(res);
        for e in events.iter_mut() {
            e.user_pulled_up = true;
        }
        Ok(events)
    }

    async fn organization_events(&self) -> Result<Vec<Event>> {
        let org_id = self.actor(Role::Org)?;
        let res = self
            .http
            .post_value("/orgs/org", &OrgEventsRequest { org_id })
            .await?;
        Ok(events_from(res))
    }

    async fn create_event(&self, event: &NewEvent) -> Result<Event> {
        let org_id = self.actor(Role::Org)?;
        if event.title.trim().is_empty() {
            return Err(ApiError::InvalidInput("An event needs a title".into()));
        }

        let body = CreateEventRequest {
            org_id,
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            date: format_backend_date(event.date_time.date()),
            time: format_backend_time(event.date_time.time()),
            is_public: !event.is_private,
            image_url: event.image_url.clone(),
            passcode: event.event_password.clone().filter(|_| event.is_private),
        };

        let res = self.http.post_value("/events", &body).await?;
        let mut raw: BackendEvent = decode_object(res, "event")?;

        // The create handler only echoes part of what it stored.
        raw.org_id.get_or_insert(org_id);
        raw.title.get_or_insert(body.title);
        raw.description.get_or_insert(body.description);
        raw.location.get_or_insert(body.location);
        raw.date.get_or_insert(body.date);
        raw.time.get_or_insert(body.time);
        raw.is_public.get_or_insert(body.is_public);
        if raw.image_url.is_none() {
            raw.image_url = body.image_url;
        }
        if raw.passcode.is_none() {
            raw.passcode = body.passcode;
        }

        Ok(normalize_event(raw, local_now()).into_inner())
    }

    async fn update_event(&self, id: &str, update: &EventUpdate) -> Result<Event> {
        self.actor(Role::Org)?;
        let res = self
            .http
            .put_value(&format!("/events/{}", segment(id)), &update_request(update))
            .await?;
        event_from(res)
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        self.actor(Role::Org)?;
        let event_id = numeric_id(id, "event")?;
        self.http
            .delete_value("/events", &DeleteEventRequest { event_id })
            .await?;
        Ok(())
    }

    async fn event_attendees(&self, id: &str) -> Result<Vec<Attendee>> {
        let event_id = numeric_id(id, "event")?;
        let res = self
            .http
            .post_value("/students-events/event", &EventStudentsRequest { event_id })
            .await?;

        let now = local_now();
        Ok(decode_list::<BackendAttendee>(res, "students")
            .into_iter()
            .map(|raw| normalize_attendee(raw, id, now).into_inner())
            .collect())
    }

    async fn update_attendee_registration(
        &self,
        event_id: &str,
        student_id: &str,
        is_confirmed: bool,
    ) -> Result<Attendee> {
        let body = UpdateRegistrationRequest {
            student_id: numeric_id(student_id, "student")?,
            event_id: numeric_id(event_id, "event")?,
            is_confirmed,
        };
        let res = self.http.put_value("/students-events/update", &body).await?;

        let mut raw: BackendAttendee = match object_payload(res, "registration") {
            Value::Null => BackendAttendee::default(),
            v => serde_json::from_value(v).map_err(|e| ApiError::Decode(e.to_string()))?,
        };
        raw.student_id.get_or_insert(body.student_id);
        raw.event_id.get_or_insert(body.event_id);
        raw.is_confirmed.get_or_insert(is_confirmed);

        Ok(normalize_attendee(raw, event_id, local_now()).into_inner())
    }

    async fn toggle_saved(&self, id: &str) -> Result<Event> {
        let res = self
            .http
            .post_empty_value(&format!("/events/{}/save", segment(id)))
            .await?;
        event_from(res)
    }

    async fn toggle_like(&self, id: &str) -> Result<Event> {
        let res = self
            .http
            .post_empty_value(&format!("/events/{}/like", segment(id)))
            .await?;
        event_from(res)
    }
}

#[async_trait]
impl CommentService for RealBackend {
    async fn comments(&self, event_id: &str) -> Result<Vec<Comment>> {
        let res = self
            .http
            .get_value(&format!("/events/{}/comments", segment(event_id)))
            .await?;

        let now = local_now();
        Ok(decode_list::<BackendComment>(res, "comments")
            .into_iter()
            .map(|raw| normalize_comment(raw, now).into_inner())
            .collect())
    }

    async fn add_comment(&self, event_id: &str, text: &str) -> Result<Comment> {
        if text.trim().is_empty() {
            return Err(ApiError::InvalidInput("A comment cannot be empty".into()));
        }
        let res = self
            .http
            .post_value(
                &format!("/events/{}/comments", segment(event_id)),
                &AddCommentRequest { text: text.into() },
            )
            .await?;
        comment_from(res)
    }

    async fn toggle_comment_vote(&self, comment_id: &str, vote: Vote) -> Result<Comment> {
        let res = self
            .http
            .post_value(
                &format!("/comments/{}/vote", segment(comment_id)),
                &VoteRequest {
                    direction: vote.as_str().into(),
                },
            )
            .await?;
        comment_from(res)
    }
}

#[async_trait]
impl WristbandService for RealBackend {
    async fn generate_wristband(&self, event_id: &str) -> Result<QrWristband> {
        let body = WristbandRequest {
            event_id: numeric_id(event_id, "event")?,
        };
        let res = self.http.post_value("/wristbands", &body).await?;
        wristband_from(res)
    }

    async fn validate_wristband(&self, code: &str) -> Result<WristbandValidation> {
        let res: WristbandValidationResponse = self
            .http
            .post(
                "/wristbands/validate",
                &ValidateWristbandRequest { code: code.into() },
            )
            .await?;
        Ok(normalize_validation(res))
    }

    async fn wristbands(&self) -> Result<Vec<QrWristband>> {
        let res = self.http.get_value("/wristbands").await?;

        let now = local_now();
        Ok(decode_list::<BackendWristband>(res, "wristbands")
            .into_iter()
            .map(|raw| normalize_wristband(raw, now).into_inner())
            .collect())
    }
}

#[async_trait]
impl AuthService for RealBackend {
    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let path = match credentials.role {
            Role::Student => "/students/login",
            Role::Org => "/orgs/login",
        };
        let body = LoginRequest {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
        };
        let res: LoginResponse = self.http.post(path, &body).await?;
        Ok(self.session(res, credentials.role))
    }

    async fn register(&self, registration: &Registration) -> Result<Session> {
        let res: LoginResponse = match registration.role {
            Role::Student => {
                let body = StudentCreateRequest {
                    name: registration.name.clone(),
                    email: registration.email.clone(),
                    password: registration.password.clone(),
                };
                self.http.post("/students/create", &body).await?
            }
            Role::Org => {
                let body = OrgCreateRequest {
                    name: registration.name.clone(),
                    email: registration.email.clone(),
                    password: registration.password.clone(),
                    description: registration.description.clone(),
                };
                self.http.post("/orgs/create", &body).await?
            }
        };
        Ok(self.session(res, registration.role))
    }

    async fn cas_login(&self, ticket: &str) -> Result<Session> {
        let res: LoginResponse = self
            .http
            .post(
                "/auth/login",
                &CasLoginRequest {
                    cas_ticket: ticket.into(),
                },
            )
            .await?;
        Ok(self.session(res, Role::Student))
    }

    async fn logout(&self) -> Result<()> {
        self.http.post_empty_value("/auth/logout").await?;
        Ok(())
    }

    async fn current_user(&self) -> Result<User> {
        let res = self.http.get_value("/auth/me").await?;
        let raw: BackendUser = decode_object(res, "user")?;
        Ok(normalize_user(raw, self.caller_role()).into_inner())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        let body = ProfileUpdateRequest {
            username: update.username.clone(),
            email: update.email.clone(),
            display_name: update.display_name.clone(),
            profile_image_url: update.profile_image_url.clone(),
        };
        let res = self.http.put_value("/auth/me", &body).await?;
        let raw: BackendUser = decode_object(res, "user")?;
        Ok(normalize_user(raw, self.caller_role()).into_inner())
    }
}

impl Backend for RealBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Real
    }
}
