use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{info, warn};

use brandhub_core::{Claims, TokenKind, new_id};
use brandhub_sql::Value;

use crate::model::{Session, TokenPair, User};
use crate::service::password::verify_password;
use crate::service::{AuthError, AuthService};

const INVALID_CREDENTIALS: &str = "invalid email or password";

impl AuthService {
    /// Check credentials and issue a token pair.
    ///
    /// Unknown email, wrong password and inactive account all fail with the
    /// same message.
    pub fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let Some((user, hash, active)) = self.find_by_email(email)? else {
            warn!("login with unknown email");
            return Err(AuthError::Unauthorized(INVALID_CREDENTIALS.into()));
        };
        if !active || !verify_password(password, &hash) {
            warn!(user = %user.id, active, "login rejected");
            return Err(AuthError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
        let pair = self.issue_tokens(&user)?;
        info!(user = %user.id, role = user.role.as_str(), "login");
        Ok(pair)
    }

    /// Issue a JWT token pair (access + refresh) for a user.
    ///
    /// Creates a session record; both tokens carry its id.
    pub fn issue_tokens(&self, user: &User) -> Result<TokenPair, AuthError> {
        let session_id = new_id();
        let now = chrono::Utc::now();
        let access_exp = now + chrono::Duration::seconds(self.config.access_token_ttl);
        let refresh_exp = now + chrono::Duration::seconds(self.config.refresh_token_ttl);

        let claims = |kind: TokenKind, exp: i64| Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            source: user.source,
            sid: session_id.clone(),
            kind,
            iat: now.timestamp(),
            exp,
        };

        let key = EncodingKey::from_secret(self.config.jwt_secret.as_bytes());
        let sign = |c: &Claims| {
            encode(&Header::default(), c, &key)
                .map_err(|e| AuthError::Internal(format!("JWT encode failed: {}", e)))
        };
        let access_token = sign(&claims(TokenKind::Access, access_exp.timestamp()))?;
        let refresh_token = sign(&claims(TokenKind::Refresh, refresh_exp.timestamp()))?;

        let session = Session {
            id: session_id.clone(),
            user_id: user.id.clone(),
            issued_at: brandhub_core::now_rfc3339(),
            expires_at: refresh_exp.to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            revoked: false,
        };
        self.insert_record("sessions", &session.id, &session, &[
            ("user_id", Value::Text(session.user_id.clone())),
            ("revoked", Value::Integer(0)),
            ("issued_at", Value::Text(session.issued_at.clone())),
            ("expires_at", Value::Text(session.expires_at.clone())),
        ])?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_ttl,
        })
    }

    /// Verify and decode a JWT of the expected kind.
    /// Fails if the signature or expiry is bad, or the session is revoked.
    pub fn verify_token(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AuthError::Unauthorized(format!("invalid token: {}", e)))?
        .claims;

        if claims.kind != expected {
            return Err(AuthError::Unauthorized("wrong token type".into()));
        }

        let session: Session = self
            .get_record("sessions", &claims.sid)
            .map_err(|_| AuthError::Unauthorized("unknown session".into()))?;
        if session.revoked {
            return Err(AuthError::Unauthorized("session has been revoked".into()));
        }

        Ok(claims)
    }

    /// Exchange a refresh token for a new pair. The old session is revoked.
    pub fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.verify_token(refresh_token, TokenKind::Refresh)?;

        let Some((user, _, active)) = self.find_by_email(&claims.email)? else {
            return Err(AuthError::Unauthorized("user not found".into()));
        };
        if !active || user.id != claims.sub {
            return Err(AuthError::Unauthorized("user is deactivated".into()));
        }

        self.revoke_session(&claims.sid)?;
        self.issue_tokens(&user)
    }

    /// Revoke a session (logout).
    pub fn revoke_session(&self, session_id: &str) -> Result<(), AuthError> {
        let mut session: Session = self.get_record("sessions", session_id)?;
        session.revoked = true;
        self.update_record("sessions", session_id, &session, &[("revoked", Value::Integer(1))])
    }

    /// Revoke all live sessions of a user. Returns how many were revoked.
    pub fn revoke_all_user_sessions(&self, user_id: &str) -> Result<u64, AuthError> {
        let rows = self.sql.query(
            "SELECT data FROM sessions WHERE user_id = ?1 AND revoked = 0",
            &[Value::Text(user_id.to_string())],
        )?;
        let mut count = 0;
        for row in &rows {
            let session: Session = crate::service::decode_row(row)?;
            self.revoke_session(&session.id)?;
            count += 1;
        }
        Ok(count)
    }
}
