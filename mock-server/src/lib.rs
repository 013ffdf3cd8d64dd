//! In-memory implementation of the MoodMate REST API.
//!
//! Bearer tokens are opaque UUIDs handed out by register and login. All
//! state lives in one `Db` behind a `RwLock`; nothing is persisted.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

pub mod error;

pub use error::{AppError, AppResult};

pub const MIN_PASSWORD_LEN: usize = 6;

/// How many of the newest entries advice is based on.
const ADVICE_WINDOW: usize = 7;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Mood {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub emoji: String,
    pub score: u8,
    pub note: String,
    pub entry_date: String,
    pub created_at: String,
}

#[derive(Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Score is taken wide so out-of-range values get a field error instead
/// of a decode failure.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodInput {
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub note: String,
    pub entry_date: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Advice {
    pub advice: String,
    pub created_at: String,
}

#[derive(Clone, Debug)]
struct User {
    id: i64,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
}

#[derive(Debug, Clone, Copy)]
struct AuthUser {
    id: i64,
}

#[derive(Default)]
pub struct Db {
    users: HashMap<String, User>,
    sessions: HashMap<String, i64>,
    moods: Vec<Mood>,
    advice: HashMap<i64, Advice>,
    next_user_id: i64,
    next_mood_id: i64,
}

impl Db {
    fn open_session(&mut self, user: &User) -> AuthResponse {
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), user.id);
        AuthResponse {
            token,
            user_id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }

    fn mood_mut(&mut self, user_id: i64, id: i64) -> AppResult<&mut Mood> {
        self.moods
            .iter_mut()
            .find(|m| m.id == id && m.user_id == user_id)
            .ok_or_else(|| AppError::NotFound("Mood not found".to_string()))
    }
}

pub type AppState = Arc<RwLock<Db>>;

pub fn app() -> Router {
    let state: AppState = Arc::new(RwLock::new(Db::default()));

    let authed = Router::new()
        .route("/api/moods", get(list_moods).post(add_mood))
        .route("/api/moods/{id}", put(update_mood).delete(delete_mood))
        .route("/api/advice/generate", post(generate_advice))
        .route("/api/advice/latest", get(latest_advice))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .merge(authed)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Local time in the wire format used for `entryDate` and `createdAt`.
pub fn now() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    let id = *state
        .read()
        .await
        .sessions
        .get(token)
        .ok_or(AppError::Unauthorized)?;

    req.extensions_mut().insert(AuthUser { id });
    Ok(next.run(req).await)
}

fn check_register(input: &RegisterInput) -> AppResult<()> {
    let mut fields = BTreeMap::new();
    if input.first_name.trim().is_empty() {
        fields.insert("first_name".to_string(), "First name is required".to_string());
    }
    if input.last_name.trim().is_empty() {
        fields.insert("last_name".to_string(), "Last name is required".to_string());
    }
    if !input.email.contains('@') {
        fields.insert("email".to_string(), "Email is invalid".to_string());
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        fields.insert(
            "password".to_string(),
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
    if fields.is_empty() {
        Ok(())
    } else {
        Err(AppError::Fields(fields))
    }
}

fn check_mood(input: &MoodInput) -> AppResult<u8> {
    let mut fields = BTreeMap::new();
    if input.emoji.trim().is_empty() {
        fields.insert("emoji".to_string(), "Emoji is required".to_string());
    }
    if input.note.trim().is_empty() {
        fields.insert("note".to_string(), "Note is required".to_string());
    }
    let score = u8::try_from(input.score).ok().filter(|s| (1..=10).contains(s));
    if score.is_none() {
        fields.insert("score".to_string(), "Score must be between 1 and 10".to_string());
    }
    match score {
        Some(score) if fields.is_empty() => Ok(score),
        _ => Err(AppError::Fields(fields)),
    }
}

async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    check_register(&input)?;
    let email = input.email.trim().to_lowercase();

    let mut db = state.write().await;
    if db.users.contains_key(&email) {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }
    db.next_user_id += 1;
    let user = User {
        id: db.next_user_id,
        email: email.clone(),
        password: input.password,
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
    };
    db.users.insert(email, user.clone());
    info!(user_id = user.id, "user registered");
    Ok((StatusCode::CREATED, Json(db.open_session(&user))))
}

async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<AuthResponse>> {
    if input.email.trim().is_empty() {
        return Err(AppError::field("email", "Email is required"));
    }
    if input.password.is_empty() {
        return Err(AppError::field("password", "Password is required"));
    }

    let mut db = state.write().await;
    let user = db
        .users
        .get(&input.email.trim().to_lowercase())
        .filter(|u| u.password == input.password)
        .cloned()
        .ok_or(AppError::Unauthorized)?;
    info!(user_id = user.id, "user logged in");
    Ok(Json(db.open_session(&user)))
}

async fn list_moods(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Json<Vec<Mood>> {
    let db = state.read().await;
    let mut moods: Vec<Mood> = db
        .moods
        .iter()
        .filter(|m| m.user_id == user.id)
        .cloned()
        .collect();
    moods.sort_by(|a, b| b.entry_date.cmp(&a.entry_date).then(b.id.cmp(&a.id)));
    Json(moods)
}

async fn add_mood(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<MoodInput>,
) -> AppResult<(StatusCode, Json<Mood>)> {
    let score = check_mood(&input)?;
    let mut db = state.write().await;
    db.next_mood_id += 1;
    let mood = Mood {
        id: db.next_mood_id,
        user_id: user.id,
        emoji: input.emoji,
        score,
        note: input.note.trim().to_string(),
        entry_date: input.entry_date.unwrap_or_else(now),
        created_at: now(),
    };
    db.moods.push(mood.clone());
    Ok((StatusCode::CREATED, Json(mood)))
}

async fn update_mood(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(input): Json<MoodInput>,
) -> AppResult<Json<Mood>> {
    let score = check_mood(&input)?;
    let mut db = state.write().await;
    let mood = db.mood_mut(user.id, id)?;
    mood.emoji = input.emoji;
    mood.score = score;
    mood.note = input.note.trim().to_string();
    if let Some(entry_date) = input.entry_date {
        mood.entry_date = entry_date;
    }
    Ok(Json(mood.clone()))
}

async fn delete_mood(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut db = state.write().await;
    let before = db.moods.len();
    db.moods.retain(|m| !(m.id == id && m.user_id == user.id));
    if db.moods.len() == before {
        return Err(AppError::NotFound("Mood not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Canned advice picked by the average of the newest scores.
pub fn advice_for(scores: &[u8]) -> &'static str {
    let total: u32 = scores.iter().map(|&s| u32::from(s)).sum();
    let average = total as f64 / scores.len().max(1) as f64;
    if average >= 8.0 {
        "You have been doing well. Keep the habits that got you here."
    } else if average >= 5.0 {
        "A steady stretch. A short walk or an early night could lift it further."
    } else {
        "The last days look heavy. Reach out to someone you trust and be gentle with yourself."
    }
}

async fn generate_advice(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<(StatusCode, Json<Advice>)> {
    let mut db = state.write().await;
    let mut moods: Vec<&Mood> = db.moods.iter().filter(|m| m.user_id == user.id).collect();
    if moods.is_empty() {
        return Err(AppError::Unprocessable(
            "Add a mood entry before asking for advice".to_string(),
        ));
    }
    moods.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
    let scores: Vec<u8> = moods.iter().take(ADVICE_WINDOW).map(|m| m.score).collect();

    let advice = Advice {
        advice: advice_for(&scores).to_string(),
        created_at: now(),
    };
    db.advice.insert(user.id, advice.clone());
    info!(user_id = user.id, "advice generated");
    Ok((StatusCode::CREATED, Json(advice)))
}

async fn latest_advice(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<Advice>> {
    let db = state.read().await;
    db.advice
        .get(&user.id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No advice yet".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_serializes_camel_case_without_owner() {
        let mood = Mood {
            id: 1,
            user_id: 9,
            emoji: "😄".to_string(),
            score: 8,
            note: "sea".to_string(),
            entry_date: "2024-05-02T10:00:00".to_string(),
            created_at: "2024-05-02T10:00:01".to_string(),
        };
        let json = serde_json::to_value(&mood).unwrap();
        assert_eq!(json["entryDate"], "2024-05-02T10:00:00");
        assert_eq!(json["createdAt"], "2024-05-02T10:00:01");
        assert!(json.get("userId").is_none());
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn register_input_is_snake_case() {
        let input: RegisterInput = serde_json::from_str(
            r#"{"first_name":"Ada","last_name":"Lovelace","email":"ada@example.com","password":"engine1"}"#,
        )
        .unwrap();
        assert_eq!(input.first_name, "Ada");
        assert!(check_register(&input).is_ok());
    }

    #[test]
    fn register_checks_every_field() {
        let input: RegisterInput = serde_json::from_str(r#"{"password":"123"}"#).unwrap();
        let Err(AppError::Fields(fields)) = check_register(&input) else {
            panic!("expected field errors");
        };
        let names: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["email", "first_name", "last_name", "password"]);
    }

    #[test]
    fn mood_score_must_be_in_range() {
        for score in [0, 11, -3, 300] {
            let input = MoodInput {
                emoji: "😄".to_string(),
                score,
                note: "x".to_string(),
                entry_date: None,
            };
            assert!(matches!(check_mood(&input), Err(AppError::Fields(f)) if f.contains_key("score")));
        }
        let input = MoodInput {
            emoji: "😄".to_string(),
            score: 10,
            note: "x".to_string(),
            entry_date: None,
        };
        assert_eq!(check_mood(&input).unwrap(), 10);
    }

    #[test]
    fn advice_follows_average() {
        assert!(advice_for(&[9, 8, 10]).starts_with("You have been doing well"));
        assert!(advice_for(&[5, 6]).starts_with("A steady stretch"));
        assert!(advice_for(&[1, 2, 3]).starts_with("The last days look heavy"));
    }

    #[test]
    fn now_uses_wire_format() {
        let stamp = now();
        assert!(chrono::NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%dT%H:%M:%S").is_ok());
    }
}
