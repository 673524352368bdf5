//! User account endpoints.
//!
//! # Endpoints
//!
//! - `POST /users/create` - Register (public)
//! - `GET /users` - List all other users (auth)
//! - `GET /users/:id` - Get one user (auth)
//! - `PUT /users/update` - Update the caller's profile, multipart (auth)
//! - `DELETE /users/:id` - Delete another user's account (auth)
//!
//! Registration derives a unique public handle from the username and hands
//! back an access token; responses never include the password hash.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    pipeline::intake::{read_multipart, store_optional},
    response::ApiResponse,
};
use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use quillcast_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::user::{resolve_public_handle, CreateUser, PublicUser, UpdateUser, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display username; the public handle is derived from it
    #[validate(length(min = 2, message = "User name must be at least 2 characters long"))]
    pub user_name: String,

    /// Email address
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    /// Password; strength-checked before hashing
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
}

/// Register response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub access_token: String,
    pub user: PublicUser,
}

/// Profile update fields (multipart text parts)
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, message = "User name must be at least 2 characters long"))]
    pub user_name: Option<String>,

    #[validate(custom(function = validate_public_name))]
    pub public_name: Option<String>,

    #[validate(length(min = 10, message = "Mobile number must be at least 10 digits long"))]
    pub phone: Option<String>,
}

/// A public handle must start with '@' and contain no whitespace.
fn validate_public_name(public_name: &str) -> Result<(), ValidationError> {
    fn invalid(code: &'static str, message: &'static str) -> ValidationError {
        let mut error = ValidationError::new(code);
        error.message = Some(std::borrow::Cow::Borrowed(message));
        error
    }

    if !public_name.starts_with('@') {
        return Err(invalid("public_name_prefix", "Public name must start with '@'"));
    }
    if public_name.chars().any(|c| c.is_whitespace()) {
        return Err(invalid("public_name_spaces", "Public name cannot contain spaces"));
    }
    if public_name.chars().count() < 2 {
        return Err(invalid(
            "public_name_length",
            "Public name must be at least 2 characters long",
        ));
    }
    Ok(())
}

/// Parses a path segment as a user id; malformed ids are a 400, not a 404.
fn parse_user_id(id: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| ApiError::BadRequest("Invalid user ID format".to_string()))
}

/// Register a new user.
///
/// Rejects duplicate emails, hashes the password, derives a unique public
/// handle (`@username`, suffixed with a counter on collision), and issues
/// an access token.
///
/// # Errors
///
/// - `409 Conflict`: email already registered
/// - `422 Unprocessable Entity`: validation or password strength failed
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<ApiResponse<RegisterResponse>> {
    req.validate()?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already exists!".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;
    let public_name = resolve_public_handle(&state.db, &req.user_name).await?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
            user_name: req.user_name,
            public_name,
            profile_image: None,
        },
    )
    .await?;

    let claims = jwt::Claims::new(user.id, jwt::TokenType::Access);
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(ApiResponse::created(
        "User registered successfully",
        RegisterResponse {
            access_token,
            user: user.sanitized(),
        },
    ))
}

/// Lists every user except the caller.
///
/// # Errors
///
/// - `404 Not Found`: no other users exist
pub async fn get_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<Vec<PublicUser>>> {
    let users = User::list_except(&state.db, auth.user_id).await?;

    if users.is_empty() {
        return Err(ApiError::NotFound("Users not found!".to_string()));
    }

    let sanitized = users.into_iter().map(User::sanitized).collect();

    Ok(ApiResponse::ok("Users retrieved successfully", sanitized))
}

/// Gets a single user by id.
pub async fn get_single_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<PublicUser>> {
    let id = parse_user_id(&id)?;

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found!".to_string()))?;

    Ok(ApiResponse::ok(
        "User retrieved successfully",
        user.sanitized(),
    ))
}

/// Updates the caller's profile.
///
/// Multipart: an optional `profileImage` file plus text fields. A public
/// handle already held by another user is a conflict.
///
/// # Errors
///
/// - `404 Not Found`: caller's account no longer exists
/// - `409 Conflict`: public handle taken by another user
/// - `422 Unprocessable Entity`: validation failed
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    multipart: Multipart,
) -> ApiResult<ApiResponse<PublicUser>> {
    let mut intake = read_multipart(multipart).await?;
    let req: UpdateUserRequest = intake.parse_fields()?;
    req.validate()?;

    if User::find_by_id(&state.db, auth.user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found!".to_string()));
    }

    if let Some(public_name) = &req.public_name {
        if User::public_name_taken(&state.db, public_name, auth.user_id).await? {
            return Err(ApiError::Conflict("User name already taken".to_string()));
        }
    }

    let profile_file = intake.take_file("profileImage");
    let profile_image =
        store_optional(state.storage.as_ref(), profile_file.as_ref(), "profileImage").await?;

    let updated = User::update(
        &state.db,
        auth.user_id,
        UpdateUser {
            user_name: req.user_name,
            public_name: req.public_name,
            phone: req.phone,
            profile_image,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found!".to_string()))?;

    Ok(ApiResponse::ok(
        "User updated successfully",
        updated.sanitized(),
    ))
}

/// Deletes another user's account.
///
/// # Errors
///
/// - `400 Bad Request`: malformed user id
/// - `403 Forbidden`: attempting to delete your own account
/// - `404 Not Found`: no such user
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let id = parse_user_id(&id)?;

    if id == auth.user_id {
        return Err(ApiError::Forbidden(
            "You can't delete your own account!".to_string(),
        ));
    }

    if User::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("User not found!".to_string()));
    }

    User::delete(&state.db, id).await?;

    Ok(ApiResponse::ok("User deleted successfully", ()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_name_validation() {
        assert!(validate_public_name("@janedoe").is_ok());
        assert!(validate_public_name("janedoe").is_err());
        assert!(validate_public_name("@jane doe").is_err());
        assert!(validate_public_name("@").is_err());
    }

    #[test]
    fn malformed_user_id_is_a_bad_request() {
        assert!(matches!(
            parse_user_id("not-a-uuid"),
            Err(ApiError::BadRequest(_))
        ));
        assert!(parse_user_id("6f2b9e0a-58c8-4f7d-9f3a-0d1b2c3d4e5f").is_ok());
    }
}
