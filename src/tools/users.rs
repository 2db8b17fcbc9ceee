//! User management tools: account listing, creation and single-field
//! updates against `/users`.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::api::{get_json, patch_json, post_json, ApiError, Gateway};
use crate::models::{ExchangeSummary, User};

use super::format::{opt_text, role_label, yes_no};
use super::validate::{require_non_empty, require_positive, require_role};

#[derive(Debug, Clone, Deserialize)]
pub struct GetUserParams {
    pub id: i64,
}

impl GetUserParams {
    pub fn validate(&self) -> Result<(), String> {
        require_positive(self.id, "id")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserParams {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: i64,
    #[serde(default)]
    pub admin: bool,
}

impl CreateUserParams {
    pub fn validate(&self) -> Result<(), String> {
        require_non_empty(&self.name, "name")?;
        require_non_empty(&self.email, "email")?;
        if !self.email.contains('@') {
            return Err("email must be a valid email address".to_string());
        }
        require_non_empty(&self.password, "password")?;
        require_role(self.role)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserEmailParams {
    pub id: i64,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserNameParams {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserPasswordParams {
    pub id: i64,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserAdminParams {
    pub id: i64,
    pub admin: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRoleParams {
    pub id: i64,
    pub role: i64,
}

pub async fn list_users(gateway: &dyn Gateway) -> Result<String, ApiError> {
    match get_json::<Vec<User>>(gateway, "/users").await {
        Ok(users) => Ok(render_user_list(&users)),
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error listing users: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn get_user(gateway: &dyn Gateway, params: GetUserParams) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    match get_json::<User>(gateway, &format!("/users/{}", params.id)).await {
        Ok(user) => Ok(render_user_detail(&user)),
        Err(ApiError::Http { status: 404, .. }) => {
            Ok(format!("User with ID {} not found.", params.id))
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error fetching user: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn create_user(
    gateway: &dyn Gateway,
    params: CreateUserParams,
) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    let body = json!({
        "name": params.name,
        "email": params.email,
        "password": params.password,
        "role": params.role,
        "admin": params.admin,
    });
    match post_json::<User>(gateway, "/users", Some(body)).await {
        Ok(user) => Ok(format!(
            "User created successfully.\n  ID: {}\n  Name: {}\n  Email: {}\n  Role: {} ({})\n  Admin: {}",
            user.id,
            user.name,
            user.email,
            role_label(user.role),
            user.role,
            yes_no(user.admin)
        )),
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error creating user: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn update_user_email(
    gateway: &dyn Gateway,
    params: UpdateUserEmailParams,
) -> Result<String, ApiError> {
    if let Err(msg) = require_positive(params.id, "id")
        .and_then(|_| require_non_empty(&params.email, "email"))
        .and_then(|_| {
            if params.email.contains('@') {
                Ok(())
            } else {
                Err("email must be a valid email address".to_string())
            }
        })
    {
        return Ok(format!("Error: {}", msg));
    }
    let body = single_field("email", json!(params.email));
    match update_user(gateway, params.id, body).await {
        Ok(user) => Ok(format!("User {} email updated to {}.", user.id, user.email)),
        Err(UpdateOutcome::NotFound) => Ok(format!("User with ID {} not found.", params.id)),
        Err(UpdateOutcome::Failed(e)) => Ok(format!("Error updating user: {}", e)),
        Err(UpdateOutcome::Fatal(e)) => Err(e),
    }
}

pub async fn update_user_name(
    gateway: &dyn Gateway,
    params: UpdateUserNameParams,
) -> Result<String, ApiError> {
    if let Err(msg) =
        require_positive(params.id, "id").and_then(|_| require_non_empty(&params.name, "name"))
    {
        return Ok(format!("Error: {}", msg));
    }
    let body = single_field("name", json!(params.name));
    match update_user(gateway, params.id, body).await {
        Ok(user) => Ok(format!("User {} name updated to {}.", user.id, user.name)),
        Err(UpdateOutcome::NotFound) => Ok(format!("User with ID {} not found.", params.id)),
        Err(UpdateOutcome::Failed(e)) => Ok(format!("Error updating user: {}", e)),
        Err(UpdateOutcome::Fatal(e)) => Err(e),
    }
}

pub async fn update_user_password(
    gateway: &dyn Gateway,
    params: UpdateUserPasswordParams,
) -> Result<String, ApiError> {
    if let Err(msg) = require_positive(params.id, "id")
        .and_then(|_| require_non_empty(&params.password, "password"))
    {
        return Ok(format!("Error: {}", msg));
    }
    let body = single_field("password", json!(params.password));
    match update_user(gateway, params.id, body).await {
        Ok(user) => Ok(format!("User {} password updated.", user.id)),
        Err(UpdateOutcome::NotFound) => Ok(format!("User with ID {} not found.", params.id)),
        Err(UpdateOutcome::Failed(e)) => Ok(format!("Error updating user: {}", e)),
        Err(UpdateOutcome::Fatal(e)) => Err(e),
    }
}

pub async fn update_user_admin(
    gateway: &dyn Gateway,
    params: UpdateUserAdminParams,
) -> Result<String, ApiError> {
    if let Err(msg) = require_positive(params.id, "id") {
        return Ok(format!("Error: {}", msg));
    }
    let body = single_field("admin", json!(params.admin));
    match update_user(gateway, params.id, body).await {
        Ok(user) => Ok(format!(
            "User {} admin flag set to {}.",
            user.id,
            yes_no(user.admin)
        )),
        Err(UpdateOutcome::NotFound) => Ok(format!("User with ID {} not found.", params.id)),
        Err(UpdateOutcome::Failed(e)) => Ok(format!("Error updating user: {}", e)),
        Err(UpdateOutcome::Fatal(e)) => Err(e),
    }
}

pub async fn update_user_role(
    gateway: &dyn Gateway,
    params: UpdateUserRoleParams,
) -> Result<String, ApiError> {
    if let Err(msg) = require_positive(params.id, "id").and_then(|_| require_role(params.role)) {
        return Ok(format!("Error: {}", msg));
    }
    let body = single_field("role", json!(params.role));
    match update_user(gateway, params.id, body).await {
        Ok(user) => Ok(format!(
            "User {} role updated to {} ({}).",
            user.id,
            role_label(user.role),
            user.role
        )),
        Err(UpdateOutcome::NotFound) => Ok(format!("User with ID {} not found.", params.id)),
        Err(UpdateOutcome::Failed(e)) => Ok(format!("Error updating user: {}", e)),
        Err(UpdateOutcome::Fatal(e)) => Err(e),
    }
}

/// Role legend. No backend call involved.
pub fn list_roles() -> String {
    "Available roles:\n  1 = Admin\n  2 = User".to_string()
}

enum UpdateOutcome {
    NotFound,
    Failed(ApiError),
    Fatal(ApiError),
}

async fn update_user(gateway: &dyn Gateway, id: i64, body: Value) -> Result<User, UpdateOutcome> {
    match patch_json::<User>(gateway, &format!("/users/{}", id), body).await {
        Ok(user) => Ok(user),
        Err(ApiError::Http { status: 404, .. }) => Err(UpdateOutcome::NotFound),
        Err(e @ ApiError::Http { .. }) => Err(UpdateOutcome::Failed(e)),
        Err(e) => Err(UpdateOutcome::Fatal(e)),
    }
}

fn single_field(name: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(name.to_string(), value);
    Value::Object(map)
}

fn render_exchange_inline(exchange: &ExchangeSummary) -> String {
    if exchange.api_error {
        format!("{} ({}) [API ERROR]", exchange.name, exchange.exchange)
    } else {
        format!("{} ({})", exchange.name, exchange.exchange)
    }
}

fn render_user_list(users: &[User]) -> String {
    let mut out = format!("Found {} users:\n", users.len());
    for user in users {
        let exchanges = if user.exchanges.is_empty() {
            "none".to_string()
        } else {
            user.exchanges
                .iter()
                .map(render_exchange_inline)
                .collect::<Vec<_>>()
                .join(", ")
        };
        out.push_str(&format!(
            "\n#{} {} <{}> | Role: {} | Admin: {} | Exchanges: {}",
            user.id,
            user.name,
            user.email,
            role_label(user.role),
            yes_no(user.admin),
            exchanges
        ));
    }
    out
}

fn render_user_detail(user: &User) -> String {
    let mut out = format!(
        "User #{}: {}\n  Email: {}\n  Role: {} ({})\n  Admin: {}\n  Timezone: {}\n  Last seen: {}\n  Created: {}",
        user.id,
        user.name,
        user.email,
        role_label(user.role),
        user.role,
        yes_no(user.admin),
        opt_text(&user.timezone),
        opt_text(&user.last_seen_at),
        opt_text(&user.created_at)
    );
    if user.exchanges.is_empty() {
        out.push_str("\n  Exchanges: none");
    } else {
        out.push_str(&format!("\n  Exchanges ({}):", user.exchanges.len()));
        for exchange in &user.exchanges {
            let health = if exchange.api_error {
                "[API ERROR]"
            } else {
                "[API OK]"
            };
            out.push_str(&format!(
                "\n    - #{} {} ({}) {}",
                exchange.id, exchange.name, exchange.exchange, health
            ));
        }
    }
    out
}
