// src/services/auth_service.rs

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        auth::{AuthResponse, Claims, LoginPayload},
        user::User,
    },
};

// Validade do token: 24 horas.
const TOKEN_TTL_SECS: usize = 60 * 60 * 24;

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    users: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt_secret: String) -> Self {
        Self {
            pool,
            users: UserRepository::new(),
            jwt_secret,
        }
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<AuthResponse, AppError> {
        payload.validate()?;

        let user = self
            .users
            .find_by_username(&self.pool, &payload.username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = payload.password;
        let hash = user.password_hash.clone();

        // bcrypt é caro; roda fora do executor async. Contas importadas
        // carregam "!" no lugar do hash e nunca autenticam.
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?
            .unwrap_or(false);

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(&user.username)?;
        Ok(AuthResponse { token })
    }

    pub fn create_token(&self, username: &str) -> Result<String, AppError> {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(data.claims)
    }

    /// Resolve o usuário dono de um token válido.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let claims = self.decode_token(token)?;

        self.users
            .find_by_username(&self.pool, &claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }
}
