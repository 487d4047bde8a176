use std::collections::HashMap;
use std::sync::Mutex;

/// Numbers requests per key so that only the answer to the most recent one is applied. A screen
/// that fires off a second search before the first comes back should never see the first one
/// land on top of it.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: Mutex<HashMap<String, u64>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    key: String,
    seq: u64,
}

impl Ticket {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request under `key`, superseding every ticket issued for it before.
    pub fn issue(&self, key: &str) -> Ticket {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        let seq = latest.entry(key.to_string()).or_insert(0);
        *seq += 1;

        Ticket {
            key: key.to_string(),
            seq: *seq,
        }
    }

    pub fn is_latest(&self, ticket: &Ticket) -> bool {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        latest.get(&ticket.key) == Some(&ticket.seq)
    }
}

/// Outcome of a sequenced request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Latest<T> {
    Current(T),
    /// A newer request for the same key was issued while this one was in flight.
    Superseded,
}

impl<T> Latest<T> {
    pub fn into_current(self) -> Option<T> {
        match self {
            Latest::Current(v) => Some(v),
            Latest::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Latest::Superseded)
    }
}
