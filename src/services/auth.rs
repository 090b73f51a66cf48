//! Authentication service: password hashing, JWT, registration and login.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::config::AppConfig;
use crate::db::Datastore;
use crate::errors::AppError;
use crate::models::profile::{NewProfile, Profile, RegisterProfile};

/// JWT claims embedded in access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub user_id: String,
    pub role: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token pair returned on successful login or registration.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Hash a plaintext password with argon2id.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Generate a JWT token pair (access + refresh).
pub fn generate_tokens(
    profile: &Profile,
    jwt_secret: &str,
    access_expiry_secs: i64,
    refresh_expiry_secs: i64,
) -> Result<TokenPair, AppError> {
    let now = Utc::now();
    let encoding_key = EncodingKey::from_secret(jwt_secret.as_bytes());

    let access_claims = Claims {
        sub: profile.email.clone(),
        user_id: profile.id.to_string(),
        role: profile.role.as_str().to_string(),
        token_type: "access".to_string(),
        exp: (now + Duration::seconds(access_expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    let refresh_claims = Claims {
        token_type: "refresh".to_string(),
        exp: (now + Duration::seconds(refresh_expiry_secs)).timestamp(),
        ..access_claims.clone()
    };

    let access_token = jsonwebtoken::encode(&Header::default(), &access_claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    let refresh_token = jsonwebtoken::encode(&Header::default(), &refresh_claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: access_expiry_secs,
    })
}

/// Validate a JWT and return the claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

fn issue(profile: &Profile, config: &AppConfig) -> Result<TokenPair, AppError> {
    generate_tokens(
        profile,
        &config.jwt_secret,
        config.jwt_access_token_expiry_secs,
        config.jwt_refresh_token_expiry_secs,
    )
}

/// Register a profile. The role chosen here never changes afterwards.
pub async fn register(
    store: &dyn Datastore,
    input: &RegisterProfile,
    config: &AppConfig,
) -> Result<(Profile, TokenPair), AppError> {
    input
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let password_hash = hash_password(&input.password)?;
    let profile = store
        .insert_profile(NewProfile {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            password_hash,
            role: input.role,
            phone: input.phone.clone(),
            address: input.address.clone(),
        })
        .await?;

    tracing::info!(profile_id = %profile.id, role = profile.role.as_str(), "Profile registered");

    let tokens = issue(&profile, config)?;
    Ok((profile, tokens))
}

/// Authenticate by email and password, returning a token pair.
pub async fn login(
    store: &dyn Datastore,
    email: &str,
    password: &str,
    config: &AppConfig,
) -> Result<TokenPair, AppError> {
    let profile = store
        .find_profile_by_email(&email.trim().to_lowercase())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(password, &profile.password_hash)? {
        tracing::warn!(profile_id = %profile.id, "Failed login attempt");
        return Err(AppError::Unauthorized);
    }

    issue(&profile, config)
}

/// Refresh an access token using a valid refresh token.
pub async fn refresh_token(
    store: &dyn Datastore,
    refresh_token_str: &str,
    config: &AppConfig,
) -> Result<TokenPair, AppError> {
    let claims = validate_token(refresh_token_str, &config.jwt_secret)?;

    if claims.token_type != "refresh" {
        return Err(AppError::Unauthorized);
    }

    let profile_id: Uuid = claims
        .user_id
        .parse()
        .map_err(|_| AppError::Unauthorized)?;

    let profile = store
        .find_profile(profile_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    issue(&profile, config)
}

/// Find a profile by ID.
pub async fn find_profile_by_id(store: &dyn Datastore, id: Uuid) -> Result<Profile, AppError> {
    store
        .find_profile(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::profile::UserRole;

    fn profile(role: UserRole) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            role,
            phone: None,
            address: None,
            created_at: Utc::now(),
        }
    }

    fn registration(email: &str) -> RegisterProfile {
        RegisterProfile {
            name: "City Kitchen".to_string(),
            email: email.to_string(),
            password: "Kitchen123!".to_string(),
            role: UserRole::Ngo,
            phone: None,
            address: Some("5 Harbour Rd".to_string()),
        }
    }

    #[test]
    fn password_hash_and_verify() {
        let password = "SecurePassword123!";
        let hash = hash_password(password).unwrap();
        assert_ne!(hash, password);
        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("WrongPassword", &hash).unwrap());
    }

    #[test]
    fn token_generation_and_validation() {
        let p = profile(UserRole::Donor);
        let secret = "test-secret-key-for-jwt";
        let tokens = generate_tokens(&p, secret, 900, 604800).unwrap();
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 900);

        let claims = validate_token(&tokens.access_token, secret).unwrap();
        assert_eq!(claims.sub, "test@example.com");
        assert_eq!(claims.token_type, "access");
        assert_eq!(claims.role, "donor");
        assert_eq!(claims.user_id, p.id.to_string());

        let refresh_claims = validate_token(&tokens.refresh_token, secret).unwrap();
        assert_eq!(refresh_claims.token_type, "refresh");
    }

    #[test]
    fn invalid_token_rejected() {
        assert!(validate_token("garbage.token.here", "secret").is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let p = profile(UserRole::Ngo);
        let secret = "test-secret";
        // Expired well beyond the 60s leeway window
        let tokens = generate_tokens(&p, secret, -3600, -3600).unwrap();
        assert!(validate_token(&tokens.access_token, secret).is_err());
    }

    #[tokio::test]
    async fn register_then_login() {
        let store = MemoryStore::new();
        let config = AppConfig::for_secret("test-secret");

        let (registered, tokens) = register(&store, &registration("Kitchen@Test.com"), &config)
            .await
            .unwrap();
        assert_eq!(registered.email, "kitchen@test.com");
        assert_eq!(registered.role, UserRole::Ngo);
        let claims = validate_token(&tokens.access_token, "test-secret").unwrap();
        assert_eq!(claims.role, "ngo");

        let login_tokens = login(&store, "kitchen@test.com", "Kitchen123!", &config)
            .await
            .unwrap();
        assert_eq!(login_tokens.token_type, "Bearer");

        let err = login(&store, "kitchen@test.com", "wrong-password", &config)
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn register_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let config = AppConfig::for_secret("test-secret");
        register(&store, &registration("dup@test.com"), &config)
            .await
            .unwrap();
        let err = register(&store, &registration("dup@test.com"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn refresh_rejects_access_token() {
        let store = MemoryStore::new();
        let config = AppConfig::for_secret("test-secret");
        let (_, tokens) = register(&store, &registration("r@test.com"), &config)
            .await
            .unwrap();

        assert!(refresh_token(&store, &tokens.refresh_token, &config).await.is_ok());
        let err = refresh_token(&store, &tokens.access_token, &config)
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }
}
