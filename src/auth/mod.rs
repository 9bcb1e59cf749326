use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, ConfigError, TokenError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire form of the token payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Verified identity attached to a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityClaims {
    pub subject: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl IdentityClaims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub claims: IdentityClaims,
}

/// Issues and verifies HS256 identity tokens with a single shared secret.
///
/// Verification is stateless: expiry travels inside the token, so there is no
/// session store and no early revocation.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: i64) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "token_ttl_hours",
                reason: format!("must be positive, got {}", ttl_hours),
            });
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        })
    }

    pub fn issue(&self, subject: &str, role: Role) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, role, Utc::now())
    }

    pub fn issue_at(&self, subject: &str, role: Role, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        // Whole seconds so the embedded timestamps round-trip exactly
        let iat = now.timestamp();
        let exp = iat + self.ttl.num_seconds();

        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat,
            exp,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(IssuedToken {
            token,
            issued_at: timestamp(iat),
            claims: IdentityClaims {
                subject: claims.sub,
                role,
                expires_at: timestamp(exp),
            },
        })
    }

    pub fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Signature first, then expiry: a tampered token is always `Malformed`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Token rejected during decode: {}", e);
            AuthError::Malformed
        })?;
        let claims = data.claims;

        if now.timestamp() >= claims.exp {
            return Err(AuthError::Expired);
        }

        Ok(IdentityClaims {
            subject: claims.sub,
            role: claims.role,
            expires_at: timestamp(claims.exp),
        })
    }
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", 24).unwrap()
    }

    #[test]
    fn empty_secret_is_config_error() {
        assert!(matches!(TokenService::new("", 24), Err(ConfigError::Missing(_))));
    }

    #[test]
    fn issue_then_verify_round_trips_claims() {
        let svc = service();
        let now = Utc::now();
        for (subject, role) in [("user-001", Role::User), ("admin-001", Role::Admin), ("", Role::User)] {
            let issued = svc.issue_at(subject, role, now).unwrap();
            let claims = svc.verify_at(&issued.token, now).unwrap();
            assert_eq!(claims.subject, subject);
            assert_eq!(claims.role, role);
            assert_eq!(claims.expires_at - issued.issued_at, Duration::hours(24));
            assert_eq!(claims, issued.claims);
        }
    }

    #[test]
    fn expired_token_reports_expired() {
        let svc = service();
        let issued_at = Utc::now() - Duration::hours(25);
        let issued = svc.issue_at("user-001", Role::User, issued_at).unwrap();
        assert_eq!(svc.verify(&issued.token), Err(AuthError::Expired));
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let svc = service();
        let now = Utc::now();
        let issued = svc.issue_at("user-001", Role::User, now).unwrap();
        let at_expiry = issued.claims.expires_at;
        assert_eq!(svc.verify_at(&issued.token, at_expiry), Err(AuthError::Expired));
        assert!(svc.verify_at(&issued.token, at_expiry - Duration::seconds(1)).is_ok());
    }

    #[test]
    fn tampered_payload_is_malformed() {
        let svc = service();
        let now = Utc::now();
        let issued = svc.issue_at("user-001", Role::User, now).unwrap();
        let parts: Vec<&str> = issued.token.split('.').collect();
        assert_eq!(parts.len(), 3);

        let payload = parts[1];
        for idx in 0..payload.len() {
            let mut bytes = payload.as_bytes().to_vec();
            bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
            let forged_payload = String::from_utf8(bytes).unwrap();
            let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);
            assert_eq!(svc.verify_at(&forged, now), Err(AuthError::Malformed), "byte {}", idx);
        }
    }

    #[test]
    fn tampered_expired_token_is_still_malformed() {
        let svc = service();
        let issued = svc.issue_at("user-001", Role::User, Utc::now() - Duration::hours(48)).unwrap();
        let forged = format!("{}x", issued.token);
        assert_eq!(svc.verify(&forged), Err(AuthError::Malformed));
    }

    #[test]
    fn foreign_secret_is_malformed() {
        let other = TokenService::new("another-secret", 24).unwrap();
        let issued = other.issue("admin-001", Role::Admin).unwrap();
        assert_eq!(service().verify(&issued.token), Err(AuthError::Malformed));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(service().verify("not-a-token"), Err(AuthError::Malformed));
        assert_eq!(service().verify(""), Err(AuthError::Malformed));
    }

    #[test]
    fn unknown_role_is_malformed() {
        let key = EncodingKey::from_secret(b"test-secret");
        let now = Utc::now().timestamp();
        let payload = serde_json::json!({ "sub": "x", "role": "root", "iat": now, "exp": now + 60 });
        let token = encode(&Header::new(Algorithm::HS256), &payload, &key).unwrap();
        assert_eq!(service().verify(&token), Err(AuthError::Malformed));
    }
}
