//! Caller identity from the upstream authorizer.
//!
//! The gateway in front of this service authenticates the request and
//! forwards its claims as JSON in the `x-authorizer-context` header:
//!
//! ```json
//! {"userId": "7f9c...", "isAwsEmployee": true}
//! ```
//!
//! `isAwsEmployee` arrives as either a boolean or a string depending on the
//! authorizer. A missing or unreadable header means an anonymous caller;
//! this service never rejects a request for lack of identity.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use hub_core::Caller;

pub const AUTHORIZER_CONTEXT_HEADER: &str = "x-authorizer-context";

/// Privilege claim in whichever shape the authorizer sent it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PrivilegeClaim {
    Flag(bool),
    Text(String),
    Other(serde_json::Value),
}

impl PrivilegeClaim {
    /// A boolean is taken as is; a string only counts when it is exactly `"true"`.
    pub fn resolve(&self) -> bool {
        match self {
            PrivilegeClaim::Flag(b) => *b,
            PrivilegeClaim::Text(s) => s == "true",
            PrivilegeClaim::Other(_) => false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerContext {
    pub user_id: Option<String>,
    pub is_aws_employee: Option<PrivilegeClaim>,
}

impl AuthorizerContext {
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                debug!(error = %e, "Ignoring unreadable authorizer context");
                None
            }
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let raw = headers.get(AUTHORIZER_CONTEXT_HEADER)?.to_str().ok()?;
        Self::parse(raw)
    }

    /// Normalise into a [`Caller`].
    ///
    /// A non-empty `userId` makes the caller authenticated. A user id that is
    /// not a UUID still authenticates but can never match a content owner.
    pub fn into_caller(self) -> Caller {
        let user_id = match self.user_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => return Caller::anonymous(),
        };
        let privileged = self
            .is_aws_employee
            .as_ref()
            .map(PrivilegeClaim::resolve)
            .unwrap_or(false);

        Caller {
            user_id: Uuid::parse_str(user_id).ok(),
            authenticated: true,
            privileged,
        }
    }
}

/// Resolve the caller for a request.
pub fn caller_from_headers(headers: &HeaderMap) -> Caller {
    AuthorizerContext::from_headers(headers)
        .map(AuthorizerContext::into_caller)
        .unwrap_or_default()
}

/// Extractor yielding the request's [`Caller`]. Never rejects.
#[derive(Debug, Clone)]
pub struct CallerIdentity(pub Caller);

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CallerIdentity(caller_from_headers(&parts.headers)))
    }
}
