use chrono::{DateTime, Duration, Utc};

use crate::portfolio::User;

use super::{AuthError, Result, TokenClaims};

/// Calculate token expiry from issue time and TTL.
///
/// Fails with `Signing` when the expiry falls outside the representable range.
pub fn calculate_expiry(issued_at: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>> {
    issued_at
        .checked_add_signed(ttl)
        .ok_or_else(|| AuthError::Signing(format!("token lifetime out of range: {ttl}")))
}

/// A token is expired once the current time reaches its `exp`.
pub fn is_token_expired(claims: &TokenClaims, now: DateTime<Utc>) -> bool {
    now.timestamp() >= claims.exp
}

/// Builds the claims for a user's token.
pub fn claims_for(user: &User, issued_at: DateTime<Utc>, ttl: Duration) -> Result<TokenClaims> {
    Ok(TokenClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        iat: issued_at.timestamp(),
        exp: calculate_expiry(issued_at, ttl)?.timestamp(),
    })
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new("a@x.com", "hash").with_name("Ada", "Lovelace")
    }

    #[test]
    fn calculate_expiry_adds_ttl() {
        let now = Utc::now();
        let ttl = Duration::minutes(30);
        assert_eq!(calculate_expiry(now, ttl).unwrap(), now + ttl);
    }

    #[test]
    fn claims_for_carries_identity_and_display_fields() {
        let user = user();
        let issued_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = claims_for(&user, issued_at, Duration::minutes(30)).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.first_name, "Ada");
        assert_eq!(claims.last_name, "Lovelace");
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_000 + 30 * 60);
    }

    #[test]
    fn token_is_expired_at_exp_boundary() {
        let issued_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = claims_for(&user(), issued_at, Duration::seconds(60)).unwrap();

        let before = DateTime::from_timestamp(claims.exp - 1, 0).unwrap();
        let at = DateTime::from_timestamp(claims.exp, 0).unwrap();
        assert!(!is_token_expired(&claims, before));
        assert!(is_token_expired(&claims, at));
    }

    #[test]
    fn expiry_past_the_calendar_range_is_an_error() {
        let now = Utc::now();

        assert!(matches!(
            calculate_expiry(now, Duration::MAX),
            Err(AuthError::Signing(_))
        ));
        assert!(claims_for(&user(), now, Duration::MAX).is_err());
    }

    #[test]
    fn extract_bearer_parses_scheme_case_insensitively() {
        assert_eq!(extract_bearer("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer("bearer  abc"), Some("abc"));
        assert_eq!(extract_bearer("Basic abc"), None);
        assert_eq!(extract_bearer("Bearer "), None);
        assert_eq!(extract_bearer("abc"), None);
    }
}
