//! Reading the caller's role and id out of the session token.
//!
//! The backend issues tokens shaped `<role>_<id>_<timestamp>`, e.g. `student_42_1690000000`, and
//! expects the client to send the id back in request bodies. Nothing signs these strings: anyone
//! can write `org_1_0` into the token file and the client will happily act as organization 1.
//! The values below are therefore named *unverified* claims. They are good for filling in request
//! bodies and nothing else; the backend has to check them against its own session state.

use crate::error::{ApiError, Result};
use crate::token_store::TokenStore;
use pullup_common::domain::Role;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnverifiedClaims {
    pub role: Role,
    pub actor_id: i64,
    pub issued_at: Option<i64>,
}

impl UnverifiedClaims {
    /// Fail unless the token belongs to `role`.
    pub fn require(self, role: Role) -> Result<i64> {
        if self.role == role {
            Ok(self.actor_id)
        } else {
            Err(ApiError::WrongRole {
                required: role,
                found: self.role,
            })
        }
    }
}

impl FromStr for UnverifiedClaims {
    type Err = ApiError;

    fn from_str(token: &str) -> Result<Self> {
        let parts = token.trim().split('_').collect::<Vec<_>>();

        if parts.len() < 2 {
            return Err(ApiError::InvalidToken(
                "expected '<role>_<id>_<timestamp>'".into(),
            ));
        }

        let role = Role::from_str(parts[0]).map_err(ApiError::InvalidToken)?;
        let actor_id = parts[1]
            .parse::<i64>()
            .map_err(|_| ApiError::InvalidToken(format!("'{}' is not a numeric id", parts[1])))?;
        let issued_at = parts.get(2).and_then(|v| v.parse::<i64>().ok());

        Ok(Self {
            role,
            actor_id,
            issued_at,
        })
    }
}

/// Claims of whoever is logged in right now.
pub fn current_claims(tokens: &dyn TokenStore) -> Result<UnverifiedClaims> {
    let token = tokens.token().ok_or(ApiError::NotLoggedIn)?;
    token.parse()
}

/// Numeric id of the logged in caller, provided they hold `role`.
pub fn actor_id(tokens: &dyn TokenStore, role: Role) -> Result<i64> {
    current_claims(tokens)?.require(role)
}

/// Tokens handed out by the mock backend follow the same shape as the real ones.
pub fn mock_token(role: Role, actor_id: i64, issued_at: i64) -> String {
    format!("{}_{}_{}", role.as_str(), actor_id, issued_at)
}
