// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{auth::Role, user::User},
};

/// Valida o token Bearer e coloca o usuário nas extensions da requisição.
pub async fn auth_guard(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::InvalidToken)?;

    let user = state.auth.authenticate(bearer.token()).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Exige o papel ADMIN. Deve rodar depois do `auth_guard`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    check_role(&request, |user| user.has_role(Role::Admin))?;
    Ok(next.run(request).await)
}

/// Exige TECHNICIAN ou ADMIN. Deve rodar depois do `auth_guard`.
pub async fn require_technician(request: Request, next: Next) -> Result<Response, AppError> {
    check_role(&request, |user| {
        user.has_role(Role::Technician) || user.has_role(Role::Admin)
    })?;
    Ok(next.run(request).await)
}

fn check_role(request: &Request, allowed: impl Fn(&User) -> bool) -> Result<(), AppError> {
    let user = request
        .extensions()
        .get::<User>()
        .ok_or(AppError::InvalidToken)?;

    if !allowed(user) {
        return Err(AppError::Forbidden);
    }

    Ok(())
}

// Extrator do usuário autenticado, para handlers que precisam dele.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::InvalidToken)
    }
}
