//! Render-time access checks for protected views.
//!
//! The guard works purely from locally stored state: it decodes the access token payload
//! without verifying the signature and compares its `exp` claim to the wall clock.
//! Freshness as seen by the server is enforced separately by the API client.

use time::OffsetDateTime;

use crate::{access_token::decode_unverified, session::Session, LOGIN_PATH};

/// Whether `token` is present, decodable and not yet expired.
pub fn is_authorized(token: Option<&str>) -> bool {
    is_authorized_at(token, OffsetDateTime::now_utc())
}

/// Like [is_authorized], evaluated at the instant `now`.
///
/// The token is valid iff its `exp`, converted to milliseconds, is strictly greater than
/// `now` in milliseconds.
pub fn is_authorized_at(token: Option<&str>, now: OffsetDateTime) -> bool {
    let Some(token) = token else {
        return false;
    };

    match decode_unverified(token) {
        Ok(claims) => {
            let now_millis = (now.unix_timestamp_nanos() / 1_000_000) as f64;
            claims.expires_at_millis() > now_millis
        }
        Err(err) => {
            tracing::trace!(%err, "treating undecodable token as unauthorized");
            false
        }
    }
}

/// The outcome of guarding a protected view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// The requested view may render unmodified.
    Render,

    /// Navigation must be handed over to the given path instead.
    Redirect(&'static str),
}

/// Gates protected views on the access token held by a [Session].
#[derive(Clone)]
pub struct RouteGuard {
    session: Session,
    login_path: &'static str,
}

impl RouteGuard {
    /// Guard views using the given session, redirecting to [LOGIN_PATH].
    pub fn new(session: Session) -> Self {
        Self {
            session,
            login_path: LOGIN_PATH,
        }
    }

    /// Override the path unauthorized navigation is redirected to.
    pub fn with_login_path(mut self, login_path: &'static str) -> Self {
        self.login_path = login_path;
        self
    }

    /// Decide whether a protected view may render now.
    pub fn check(&self) -> Navigation {
        self.check_at(OffsetDateTime::now_utc())
    }

    /// Decide whether a protected view may render at the instant `now`.
    ///
    /// A storage that cannot be read counts as no token at all.
    pub fn check_at(&self, now: OffsetDateTime) -> Navigation {
        let token = self.session.access_token().unwrap_or_else(|err| {
            tracing::debug!(%err, "could not read access token");
            None
        });

        if is_authorized_at(token.as_deref(), now) {
            Navigation::Render
        } else {
            Navigation::Redirect(self.login_path)
        }
    }
}
