use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vote::Up => "up",
            Vote::Down => "down",
        }
    }
}

impl FromStr for Vote {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Vote::Up),
            "down" => Ok(Vote::Down),
            other => Err(format!("unknown vote '{other}'")),
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Comment {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub username: String,
    pub user_image_url: Option<String>,
    pub text: String,
    pub created_at: OffsetDateTime,
    pub upvotes: u32,
    pub downvotes: u32,
    pub user_vote: Option<Vote>,
}

impl Comment {
    /// Voting the same way twice takes the vote back, voting the other way moves it.
    pub fn toggle_vote(&mut self, vote: Vote) {
        match self.user_vote.take() {
            Some(current) => {
                self.retract(current);
                if current != vote {
                    self.cast(vote);
                }
            }
            None => self.cast(vote),
        }
    }

    fn cast(&mut self, vote: Vote) {
        match vote {
            Vote::Up => self.upvotes += 1,
            Vote::Down => self.downvotes += 1,
        }
        self.user_vote = Some(vote);
    }

    fn retract(&mut self, vote: Vote) {
        match vote {
            Vote::Up => self.upvotes = self.upvotes.saturating_sub(1),
            Vote::Down => self.downvotes = self.downvotes.saturating_sub(1),
        }
        self.user_vote = None;
    }

    pub fn score(&self) -> i64 {
        self.upvotes as i64 - self.downvotes as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment() -> Comment {
        Comment {
            id: "c1".into(),
            event_id: "1".into(),
            user_id: "2".into(),
            username: "jdoe".into(),
            user_image_url: None,
            text: "see you there".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            upvotes: 3,
            downvotes: 1,
            user_vote: None,
        }
    }

    #[test]
    fn same_vote_twice_retracts() {
        let mut c = comment();
        c.toggle_vote(Vote::Up);
        assert_eq!((c.upvotes, c.downvotes, c.user_vote), (4, 1, Some(Vote::Up)));
        c.toggle_vote(Vote::Up);
        assert_eq!((c.upvotes, c.downvotes, c.user_vote), (3, 1, None));
    }

    #[test]
    fn opposite_vote_moves() {
        let mut c = comment();
        c.toggle_vote(Vote::Down);
        c.toggle_vote(Vote::Up);
        assert_eq!((c.upvotes, c.downvotes, c.user_vote), (4, 1, Some(Vote::Up)));
        assert_eq!(c.score(), 3);
    }

    #[test]
    fn counts_never_underflow() {
        let mut c = comment();
        c.downvotes = 0;
        c.user_vote = Some(Vote::Down);
        c.toggle_vote(Vote::Down);
        assert_eq!(c.downvotes, 0);
        assert_eq!(c.user_vote, None);
    }
}
