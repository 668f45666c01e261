//! Route access gate.
//!
//! Decides from the access credential alone whether a protected page may be
//! served. It never calls the backend, so a credential revoked by logout stays
//! acceptable here until it expires.

use crate::models::Role;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

pub const LOGIN_ROUTE: &str = "/login";
pub const UNAUTHORIZED_ROUTE: &str = "/unauthorized";

const DASHBOARD_PREFIX: &str = "/dashboard";
const ADMIN_PREFIX: &str = "/admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(&'static str),
}

/// Claims carried by the access credential.
#[derive(Debug, Deserialize)]
pub struct AccessClaims {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    pub role: String,
    /// Checked when present; a credential issued without one never expires.
    #[serde(default)]
    pub exp: Option<i64>,
}

pub struct RouteGate {
    key: DecodingKey,
    validation: Validation,
}

impl RouteGate {
    /// Gate over HS256 credentials signed with `secret`.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims::<&str>(&[]);
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn decide(&self, credential: Option<&str>, path: &str) -> GateDecision {
        let dashboard = is_under(path, DASHBOARD_PREFIX);
        let admin = is_under(path, ADMIN_PREFIX);
        if !dashboard && !admin {
            return GateDecision::Allow;
        }

        let Some(token) = credential.filter(|t| !t.is_empty()) else {
            tracing::debug!(path, "no credential for protected path");
            return GateDecision::Redirect(LOGIN_ROUTE);
        };

        let claims = match self.verify(token) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::debug!(path, error = %err, "credential rejected");
                return GateDecision::Redirect(LOGIN_ROUTE);
            }
        };

        let role = claims.role.parse::<Role>().ok();
        if dashboard && role.is_none() {
            return GateDecision::Redirect(UNAUTHORIZED_ROUTE);
        }
        if admin && role != Some(Role::Admin) {
            return GateDecision::Redirect(UNAUTHORIZED_ROUTE);
        }

        GateDecision::Allow
    }

    pub fn verify(&self, token: &str) -> jsonwebtoken::errors::Result<AccessClaims> {
        decode::<AccessClaims>(token, &self.key, &self.validation).map(|data| data.claims)
    }
}

/// `prefix` itself or anything below it, matched on path segments.
fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .map_or(false, |rest| rest.starts_with('/'))
}
