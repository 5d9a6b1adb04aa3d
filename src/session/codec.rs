//! Cookie codec for the admin session.
//!
//! Three cookies make up a session: the auth token, the admin identity and the
//! last-active timestamp. Identity and timestamp are signed by the codec; the
//! token carries its own signature and is checked by the validator. Decoding
//! never fails: each cookie that is missing, unsigned, or unparsable decodes to
//! `None` on its own.

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use garde::Validate;
use tower_cookies::cookie::time::Duration;
use tower_cookies::cookie::{Cookie, CookieJar, SameSite};
use tower_cookies::Cookies;

use crate::crypto::signing::SessionSigner;
use crate::models::session::{AuthToken, Identity, Session};

/// Cookie holding the admin auth token.
pub const AUTH_TOKEN_COOKIE: &str = "admin_auth_token";
/// Cookie holding the admin identity.
pub const ADMIN_USER_COOKIE: &str = "admin_user";
/// Cookie holding the last-active timestamp.
pub const LAST_ACTIVE_COOKIE: &str = "admin_last_active";

/// Every cookie that belongs to the admin session.
pub const SESSION_COOKIES: [&str; 3] = [AUTH_TOKEN_COOKIE, ADMIN_USER_COOKIE, LAST_ACTIVE_COOKIE];

/// One outbound cookie change.
#[derive(Debug, Clone, PartialEq)]
pub enum CookieDirective {
    /// Set the cookie to a new value.
    Set(Cookie<'static>),
    /// Tell the browser to drop the cookie.
    Clear(Cookie<'static>),
}

impl CookieDirective {
    /// The cookie this directive applies to.
    pub fn cookie(&self) -> &Cookie<'static> {
        match self {
            CookieDirective::Set(cookie) | CookieDirective::Clear(cookie) => cookie,
        }
    }

    /// The name of the cookie this directive applies to.
    pub fn name(&self) -> &str {
        self.cookie().name()
    }

    /// Adds the directive to the response cookie jar.
    ///
    /// Clears are sent as explicit removal cookies so the browser drops the
    /// cookie even when this request did not carry it.
    pub fn apply(self, cookies: &Cookies) {
        match self {
            CookieDirective::Set(cookie) | CookieDirective::Clear(cookie) => cookies.add(cookie),
        }
    }
}

/// Applies a set of directives to the response cookie jar.
pub fn apply_directives(cookies: &Cookies, directives: Vec<CookieDirective>) {
    for directive in directives {
        directive.apply(cookies);
    }
}

/// Copies the request's cookies into a plain jar for decoding.
pub fn request_jar(cookies: &Cookies) -> CookieJar {
    let mut jar = CookieJar::new();
    for cookie in cookies.list() {
        jar.add_original(cookie.into_owned());
    }
    jar
}

/// Encodes and decodes the admin session cookies.
#[derive(Clone)]
pub struct CookieCodec {
    signer: SessionSigner,
    max_age: Duration,
    secure: bool,
}

impl CookieCodec {
    /// Creates a new `CookieCodec`.
    ///
    /// # Arguments
    ///
    /// * `signer` - Signs the identity and timestamp cookies.
    /// * `max_age_days` - `Max-Age` given to every cookie that is set.
    /// * `secure` - Whether cookies are marked `Secure`.
    pub fn new(signer: SessionSigner, max_age_days: i64, secure: bool) -> Self {
        Self {
            signer,
            max_age: Duration::days(max_age_days),
            secure,
        }
    }

    /// The signer shared with token issuance and validation.
    pub fn signer(&self) -> &SessionSigner {
        &self.signer
    }

    /// Decodes the admin session from the request's cookies.
    pub fn decode(&self, jar: &CookieJar) -> Session {
        Session {
            auth_token: jar
                .get(AUTH_TOKEN_COOKIE)
                .map(|cookie| cookie.value())
                .filter(|value| !value.is_empty())
                .map(AuthToken::new),
            identity: jar
                .get(ADMIN_USER_COOKIE)
                .and_then(|cookie| self.decode_identity(cookie.value())),
            last_active_at: jar
                .get(LAST_ACTIVE_COOKIE)
                .and_then(|cookie| self.decode_last_active(cookie.value())),
        }
    }

    fn decode_identity(&self, value: &str) -> Option<Identity> {
        let payload = self.signer.verify(ADMIN_USER_COOKIE, value).or_else(|| {
            tracing::warn!("❌ Admin identity cookie failed signature check");
            None
        })?;
        let json = general_purpose::URL_SAFE_NO_PAD.decode(payload).ok()?;
        let identity: Identity = sonic_rs::from_slice(&json).ok()?;

        match identity.validate() {
            Ok(()) => Some(identity),
            Err(report) => {
                tracing::warn!("❌ Admin identity cookie rejected: {}", report);
                None
            }
        }
    }

    fn decode_last_active(&self, value: &str) -> Option<DateTime<Utc>> {
        let payload = self.signer.verify(LAST_ACTIVE_COOKIE, value).or_else(|| {
            tracing::warn!("❌ Last-active cookie failed signature check");
            None
        })?;
        let millis: i64 = payload.parse().ok()?;
        DateTime::from_timestamp_millis(millis)
    }

    /// Encodes a whole session.
    ///
    /// Present fields are set and absent fields are cleared, so the three
    /// cookies always move together.
    pub fn encode(&self, session: &Session) -> Vec<CookieDirective> {
        vec![
            match &session.auth_token {
                Some(token) => self.encode_auth_token(token),
                None => self.clear(AUTH_TOKEN_COOKIE),
            },
            match &session.identity {
                Some(identity) => self.encode_identity(identity),
                None => self.clear(ADMIN_USER_COOKIE),
            },
            match session.last_active_at {
                Some(at) => self.encode_last_active(at),
                None => self.clear(LAST_ACTIVE_COOKIE),
            },
        ]
    }

    /// Sets the auth token cookie.
    pub fn encode_auth_token(&self, token: &AuthToken) -> CookieDirective {
        CookieDirective::Set(self.cookie(AUTH_TOKEN_COOKIE, token.as_str().to_string()))
    }

    /// Sets the identity cookie.
    pub fn encode_identity(&self, identity: &Identity) -> CookieDirective {
        match sonic_rs::to_string(identity) {
            Ok(json) => {
                let payload = general_purpose::URL_SAFE_NO_PAD.encode(json);
                let value = self.signer.sign(ADMIN_USER_COOKIE, &payload);
                CookieDirective::Set(self.cookie(ADMIN_USER_COOKIE, value))
            }
            Err(e) => {
                tracing::error!("❌ Admin identity serialization failed: {}", e);
                self.clear(ADMIN_USER_COOKIE)
            }
        }
    }

    /// Sets the last-active cookie.
    pub fn encode_last_active(&self, at: DateTime<Utc>) -> CookieDirective {
        let value = self
            .signer
            .sign(LAST_ACTIVE_COOKIE, &at.timestamp_millis().to_string());
        CookieDirective::Set(self.cookie(LAST_ACTIVE_COOKIE, value))
    }

    /// Clears one session cookie.
    pub fn clear(&self, name: &'static str) -> CookieDirective {
        let mut cookie = self.cookie(name, String::new());
        cookie.make_removal();
        CookieDirective::Clear(cookie)
    }

    /// Clears every session cookie.
    pub fn clear_all(&self) -> Vec<CookieDirective> {
        SESSION_COOKIES.into_iter().map(|name| self.clear(name)).collect()
    }

    fn cookie(&self, name: &'static str, value: String) -> Cookie<'static> {
        let mut cookie = Cookie::new(name, value);
        cookie.set_http_only(true);
        if self.secure {
            cookie.set_secure(true);
        }
        cookie.set_same_site(SameSite::Lax);
        cookie.set_max_age(self.max_age);
        cookie.set_path("/");
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    use crate::models::session::Role;

    fn codec() -> CookieCodec {
        CookieCodec::new(SessionSigner::new(&[3u8; 32]).unwrap(), 7, false)
    }

    fn jar_from(directives: &[CookieDirective]) -> CookieJar {
        let mut jar = CookieJar::new();
        for directive in directives {
            if let CookieDirective::Set(cookie) = directive {
                jar.add_original(Cookie::new(cookie.name().to_string(), cookie.value().to_string()));
            }
        }
        jar
    }

    fn jar_with(pairs: &[(&'static str, &'static str)]) -> CookieJar {
        let mut jar = CookieJar::new();
        for (name, value) in pairs {
            jar.add_original(Cookie::new(*name, *value));
        }
        jar
    }

    fn sample_session() -> Session {
        Session {
            auth_token: Some(AuthToken::new("token.abcd")),
            identity: Some(Identity {
                username: "jane".to_string(),
                role: Role::Owner,
            }),
            last_active_at: DateTime::from_timestamp_millis(1_760_000_000_123),
        }
    }

    #[test]
    fn empty_jar_decodes_to_empty_session() {
        assert_eq!(codec().decode(&CookieJar::new()), Session::default());
    }

    #[test]
    fn encoded_session_decodes_back() {
        let codec = codec();
        let session = sample_session();
        let directives = codec.encode(&session);

        assert_eq!(directives.len(), 3);
        assert_eq!(codec.decode(&jar_from(&directives)), session);
    }

    #[test]
    fn each_field_degrades_independently() {
        let codec = codec();
        let good = codec.encode(&sample_session());
        let mut jar = jar_from(&good);
        jar.add_original(Cookie::new(ADMIN_USER_COOKIE, "garbage"));

        let decoded = codec.decode(&jar);
        assert!(decoded.auth_token.is_some());
        assert!(decoded.identity.is_none());
        assert!(decoded.last_active_at.is_some());
    }

    #[test]
    fn unsigned_values_are_absent() {
        let decoded = codec().decode(&jar_with(&[
            (ADMIN_USER_COOKIE, "eyJ1c2VybmFtZSI6ImphbmUiLCJyb2xlIjoib3duZXIifQ"),
            (LAST_ACTIVE_COOKIE, "1760000000000"),
        ]));
        assert!(decoded.identity.is_none());
        assert!(decoded.last_active_at.is_none());
    }

    #[test]
    fn signed_but_invalid_identity_is_absent() {
        let codec = codec();
        let json = r#"{"username":"<b>","role":"owner"}"#;
        let payload = general_purpose::URL_SAFE_NO_PAD.encode(json);
        let value = codec.signer().sign(ADMIN_USER_COOKIE, &payload);

        let mut jar = CookieJar::new();
        jar.add_original(Cookie::new(ADMIN_USER_COOKIE, value));
        assert!(codec.decode(&jar).identity.is_none());
    }

    #[test]
    fn unknown_role_is_absent() {
        let codec = codec();
        let json = r#"{"username":"jane","role":"superuser"}"#;
        let payload = general_purpose::URL_SAFE_NO_PAD.encode(json);
        let value = codec.signer().sign(ADMIN_USER_COOKIE, &payload);

        let mut jar = CookieJar::new();
        jar.add_original(Cookie::new(ADMIN_USER_COOKIE, value));
        assert!(codec.decode(&jar).identity.is_none());
    }

    #[test]
    fn empty_token_cookie_is_absent() {
        let decoded = codec().decode(&jar_with(&[(AUTH_TOKEN_COOKIE, "")]));
        assert!(decoded.auth_token.is_none());
    }

    #[test]
    fn set_cookies_carry_session_attributes() {
        let directives = codec().encode(&sample_session());
        for directive in &directives {
            let cookie = directive.cookie();
            assert_eq!(cookie.http_only(), Some(true));
            assert_eq!(cookie.same_site(), Some(SameSite::Lax));
            assert_eq!(cookie.path(), Some("/"));
            assert_eq!(cookie.max_age(), Some(Duration::days(7)));
        }
    }

    #[test]
    fn clear_all_removes_every_cookie() {
        let directives = codec().clear_all();
        let names: Vec<&str> = directives.iter().map(|d| d.name()).collect();
        assert_eq!(names, SESSION_COOKIES.to_vec());

        for directive in &directives {
            assert!(matches!(directive, CookieDirective::Clear(_)));
            assert_eq!(directive.cookie().value(), "");
            assert_eq!(directive.cookie().max_age(), Some(Duration::ZERO));
        }
    }

    #[test]
    fn absent_fields_encode_as_clears() {
        let session = Session {
            identity: None,
            ..sample_session()
        };
        let directives = codec().encode(&session);
        assert!(matches!(directives[0], CookieDirective::Set(_)));
        assert!(matches!(directives[1], CookieDirective::Clear(_)));
        assert!(matches!(directives[2], CookieDirective::Set(_)));
    }
}
