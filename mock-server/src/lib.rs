use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
}

/// Body of POST and PUT. Any `id` in the body is ignored; the server owns ids.
#[derive(Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub website: Option<String>,
    pub company: Option<Company>,
    pub address: Option<Address>,
}

impl UserInput {
    fn into_user(self, id: u64) -> User {
        User {
            id,
            name: self.name,
            email: normalize_email(&self.email),
            phone: self.phone,
            website: self.website,
            company: self.company,
            address: self.address,
        }
    }
}

/// Stored emails are trimmed and lowercased, so a client echoing back what it
/// sent would diverge from the server.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug)]
pub struct Directory {
    users: Vec<User>,
    next_id: u64,
}

impl Directory {
    pub fn with_users(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        Self { users, next_id }
    }
}

pub type Db = Arc<RwLock<Directory>>;

pub fn app() -> Router {
    app_with_users(Vec::new())
}

/// Router seeded with `users`, kept in the given order.
pub fn app_with_users(users: Vec<User>) -> Router {
    let db: Db = Arc::new(RwLock::new(Directory::with_users(users)));
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_users(listener: TcpListener, users: Vec<User>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_users(users)).await
}

/// A handful of records in the shape the public demo API serves.
pub fn demo_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "Leanne Graham".to_string(),
            email: "sincere@april.biz".to_string(),
            phone: "1-770-736-8031 x56442".to_string(),
            website: Some("hildegard.org".to_string()),
            company: Some(Company {
                name: "Romaguera-Crona".to_string(),
                catch_phrase: "Multi-layered client-server neural-net".to_string(),
                bs: "harness real-time e-markets".to_string(),
            }),
            address: Some(Address {
                street: "Kulas Light".to_string(),
                suite: "Apt. 556".to_string(),
                city: "Gwenborough".to_string(),
                zipcode: "92998-3874".to_string(),
            }),
        },
        User {
            id: 2,
            name: "Ervin Howell".to_string(),
            email: "shanna@melissa.tv".to_string(),
            phone: "010-692-6593 x09125".to_string(),
            website: Some("anastasia.net".to_string()),
            company: None,
            address: None,
        },
        User {
            id: 3,
            name: "Clementine Bauch".to_string(),
            email: "nathan@yesenia.net".to_string(),
            phone: "1-463-123-4447".to_string(),
            website: None,
            company: None,
            address: None,
        },
    ]
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    let dir = db.read().await;
    Json(dir.users.clone())
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<UserInput>,
) -> (StatusCode, Json<User>) {
    let mut dir = db.write().await;
    let user = input.into_user(dir.next_id);
    dir.next_id += 1;
    dir.users.push(user.clone());
    tracing::info!(id = user.id, "user created");
    (StatusCode::CREATED, Json(user))
}

async fn get_user(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<User>, StatusCode> {
    let dir = db.read().await;
    dir.users
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UserInput>,
) -> Result<Json<User>, StatusCode> {
    let mut dir = db.write().await;
    let slot = dir.users.iter_mut().find(|u| u.id == id).ok_or(StatusCode::NOT_FOUND)?;
    *slot = input.into_user(id);
    tracing::info!(id, "user updated");
    Ok(Json(slot.clone()))
}

async fn delete_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let mut dir = db.write().await;
    let before = dir.users.len();
    dir.users.retain(|u| u.id != id);
    if dir.users.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    tracing::info!(id, "user deleted");
    Ok(Json(serde_json::json!({})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_to_json() {
        let user = User {
            id: 1,
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            phone: "555".to_string(),
            website: None,
            company: Some(Company {
                name: "Acme".to_string(),
                catch_phrase: "Things".to_string(),
                bs: "stuff".to_string(),
            }),
            address: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["company"]["catchPhrase"], "Things");
        assert!(json.get("website").is_none());
    }

    #[test]
    fn input_ignores_client_id() {
        let input: UserInput = serde_json::from_str(
            r#"{"id":99,"name":"Cy","email":"cy@x.com","phone":"555"}"#,
        )
        .unwrap();
        assert_eq!(input.into_user(4).id, 4);
    }

    #[test]
    fn input_rejects_missing_name() {
        let result: Result<UserInput, _> = serde_json::from_str(r#"{"email":"a@b.c","phone":"1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(normalize_email("  Bob@X.COM "), "bob@x.com");
    }

    #[test]
    fn next_id_follows_seed() {
        let dir = Directory::with_users(demo_users());
        assert_eq!(dir.next_id, 4);
        assert_eq!(Directory::with_users(Vec::new()).next_id, 1);
    }
}
