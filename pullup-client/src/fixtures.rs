//! Campus data the mock backend starts out with. Dates are laid out relative to `now` so the
//! listing always shows upcoming events.

use crate::domain::{Comment, Event, User, Vote};
use crate::normalize::{wall_clock, PLACEHOLDER_IMAGE};
use pullup_common::domain::Role;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, Time};

/// A user the mock backend can log in as.
#[derive(Debug, Clone, PartialEq)]
pub struct MockAccount {
    pub user: User,
    pub email: String,
    pub password: String,
}

pub const MOCK_PASSWORD: &str = "password123";

fn account(id: &str, username: &str, display_name: &str, role: Role) -> MockAccount {
    MockAccount {
        user: User {
            id: id.into(),
            username: username.into(),
            display_name: display_name.into(),
            is_organization: role == Role::Org,
            profile_image_url: Some(format!(
                "https://via.placeholder.com/150?text={}",
                username
            )),
            user_type: role,
        },
        email: format!("{username}@campus.edu"),
        password: MOCK_PASSWORD.into(),
    }
}

/// Organizations come first; the first one is who the mock acts as before anyone logs in.
pub fn accounts() -> Vec<MockAccount> {
    vec![
        account("1", "acm", "ACM Student Chapter", Role::Org),
        account("2", "outdoors", "Outdoors Club", Role::Org),
        account("3", "jazz", "Jazz Ensemble", Role::Org),
        account("101", "johndoe", "John Doe", Role::Student),
        account("102", "janesmith", "Jane Smith", Role::Student),
    ]
}

fn at(now: OffsetDateTime, days: i64, hour: u8, minute: u8) -> PrimitiveDateTime {
    let day = wall_clock(now) + Duration::days(days);
    let time = Time::from_hms(hour, minute, 0).unwrap_or(Time::MIDNIGHT);
    day.replace_time(time)
}

#[allow(clippy::too_many_arguments)]
fn event(
    now: OffsetDateTime,
    id: &str,
    organizer: &MockAccount,
    title: &str,
    description: &str,
    location: &str,
    date_time: PrimitiveDateTime,
    pull_up_count: u32,
) -> Event {
    Event {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        organizer_id: organizer.user.id.clone(),
        organizer_name: organizer.user.display_name.clone(),
        organizer_image_url: organizer.user.profile_image_url.clone(),
        location: location.into(),
        date_time,
        image_url: PLACEHOLDER_IMAGE.into(),
        is_private: false,
        pull_up_count,
        user_pulled_up: false,
        event_password: None,
        created_at: now - Duration::days(7),
    }
}

pub fn events(now: OffsetDateTime) -> Vec<Event> {
    let orgs = accounts();
    let (acm, outdoors, jazz) = (&orgs[0], &orgs[1], &orgs[2]);

    let mut hack_night = event(
        now,
        "1",
        acm,
        "Hack Night",
        "Bring a laptop and a half finished idea. Pizza at eight.",
        "Engineering Hall 201",
        at(now, 2, 19, 0),
        24,
    );
    hack_night.user_pulled_up = true;

    let mut sunrise_hike = event(
        now,
        "2",
        outdoors,
        "Sunrise Hike",
        "Meet at the trailhead, headlamps recommended.",
        "North Trailhead",
        at(now, 4, 5, 30),
        11,
    );
    sunrise_hike.is_private = true;
    sunrise_hike.event_password = Some("summit".into());

    vec![
        hack_night,
        sunrise_hike,
        event(
            now,
            "3",
            jazz,
            "Late Night Jam",
            "Open jam session, all instruments welcome.",
            "Student Union Lounge",
            at(now, 6, 21, 30),
            38,
        ),
        event(
            now,
            "4",
            acm,
            "Resume Workshop",
            "Recruiters review resumes one on one.",
            "Career Center",
            at(now, 9, 12, 0),
            7,
        ),
        event(
            now,
            "5",
            outdoors,
            "Gear Swap",
            "Trade the gear you never use for gear you will.",
            "Quad",
            at(now, 12, 15, 0),
            0,
        ),
    ]
}

pub fn comments(now: OffsetDateTime) -> Vec<Comment> {
    let students = accounts()
        .into_iter()
        .filter(|a| a.user.user_type == Role::Student)
        .collect::<Vec<_>>();
    let (john, jane) = (&students[0].user, &students[1].user);

    let comment = |id: &str, event_id: &str, who: &User, text: &str, up: u32, down: u32| Comment {
        id: id.into(),
        event_id: event_id.into(),
        user_id: who.id.clone(),
        username: who.username.clone(),
        user_image_url: who.profile_image_url.clone(),
        text: text.into(),
        created_at: now - Duration::hours(up as i64 + 1),
        upvotes: up,
        downvotes: down,
        user_vote: None,
    };

    let mut popular = comment("1", "1", john, "Is there a beginner track this time?", 5, 0);
    popular.user_vote = Some(Vote::Up);

    vec![
        popular,
        comment("2", "1", jane, "Last one ran until 2am, bring snacks.", 3, 1),
        comment("3", "3", jane, "Can I bring a cajon?", 2, 0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_are_consistent() {
        let now = OffsetDateTime::UNIX_EPOCH + Duration::days(20_000);
        let accounts = accounts();
        let events = events(now);

        assert_eq!(accounts[0].user.user_type, Role::Org);
        for e in &events {
            assert!(accounts.iter().any(|a| a.user.id == e.organizer_id));
            assert!(e.date_time > wall_clock(now));
            assert!(e.id.parse::<i64>().is_ok());
        }
        for c in comments(now) {
            assert!(events.iter().any(|e| e.id == c.event_id));
        }
    }
}
