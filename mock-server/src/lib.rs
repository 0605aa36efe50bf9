use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use uuid::Uuid;

pub const TENANT_HEADER: &str = "x-fusionauth-tenantid";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub active: bool,
}

#[derive(Deserialize)]
pub struct NewUser {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct UserRequest {
    pub user: NewUser,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub application_id: Uuid,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Deserialize)]
pub struct RegistrationRequest {
    pub registration: Registration,
}

#[derive(Deserialize)]
pub struct CombinedRequest {
    pub user: NewUser,
    pub registration: Registration,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub login_id: String,
    pub password: String,
    pub application_id: Option<Uuid>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLookup {
    pub email: Option<String>,
    pub login_id: Option<String>,
}

#[derive(Deserialize)]
pub struct ReportWindow {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

pub struct MockState {
    api_key: String,
    users: RwLock<HashMap<Uuid, User>>,
    registrations: RwLock<HashMap<(Uuid, Uuid), Registration>>,
}

pub type Db = Arc<MockState>;

/// Request rejections, rendered the way FusionAuth renders them.
#[derive(Debug)]
pub enum Rejection {
    Unauthorized,
    NotFound,
    Validation(BTreeMap<String, Vec<Value>>),
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Rejection::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Rejection::NotFound => StatusCode::NOT_FOUND.into_response(),
            Rejection::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "fieldErrors": errors }))).into_response()
            }
        }
    }
}

fn field_error(errors: &mut BTreeMap<String, Vec<Value>>, kind: &str, field: &str) {
    errors.entry(field.to_string()).or_default().push(json!({
        "code": format!("[{kind}]{field}"),
        "message": format!("The [{field}] property is {kind}."),
    }));
}

pub fn app(api_key: &str) -> Router {
    let db: Db = Arc::new(MockState {
        api_key: api_key.to_string(),
        users: RwLock::new(HashMap::new()),
        registrations: RwLock::new(HashMap::new()),
    });
    Router::new()
        .route("/api/user", get(lookup_user).post(create_user))
        .route("/api/user/{id}", get(get_user).post(create_user_with_id).delete(delete_user))
        .route("/api/user/registration", post(create_user_and_register))
        .route("/api/user/registration/{user_id}", post(register))
        .route(
            "/api/user/registration/{user_id}/{application_id}",
            get(get_registration).delete(delete_registration),
        )
        .route("/api/login", post(login))
        .route("/api/login/{user_id}", put(login_instant))
        .route("/api/login/{user_id}/{application_id}", put(login_instant_for_application))
        .route("/api/logout", post(logout))
        .route("/api/jwt/issue", get(issue_jwt))
        .route("/api/jwt/validate", get(validate_jwt))
        .route("/api/jwt/refresh", post(refresh_jwt))
        .route("/api/report/totals", get(report_totals))
        .route("/api/report/{name}", get(report))
        .with_state(db)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock identity service listening");
    }
    axum::serve(listener, app(api_key)).await
}

fn require_api_key(db: &MockState, headers: &HeaderMap) -> Result<(), Rejection> {
    let presented = headers.get("authorization").and_then(|v| v.to_str().ok());
    if presented == Some(db.api_key.as_str()) {
        Ok(())
    } else {
        warn!("rejected request with a missing or wrong api key");
        Err(Rejection::Unauthorized)
    }
}

/// Resolves `<scheme> token-<uuid>` from the Authorization header.
fn token_subject(headers: &HeaderMap, scheme: &str) -> Option<Uuid> {
    let value = headers.get("authorization")?.to_str().ok()?;
    let token = value.strip_prefix(scheme)?.strip_prefix(' ')?;
    token.strip_prefix("token-")?.parse().ok()
}

async fn insert_user(db: &MockState, id: Uuid, input: NewUser) -> Result<User, Rejection> {
    let mut errors = BTreeMap::new();
    let email = input.email.unwrap_or_default();
    let password = input.password.unwrap_or_default();
    if email.trim().is_empty() {
        field_error(&mut errors, "blank", "user.email");
    }
    if password.is_empty() {
        field_error(&mut errors, "blank", "user.password");
    }

    let mut users = db.users.write().await;
    if users.values().any(|u| u.email == email) {
        field_error(&mut errors, "duplicate", "user.email");
    }
    if !errors.is_empty() {
        return Err(Rejection::Validation(errors));
    }

    let user = User {
        id,
        email,
        password,
        active: true,
    };
    users.insert(id, user.clone());
    Ok(user)
}

async fn create_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<UserRequest>,
) -> Result<Json<Value>, Rejection> {
    require_api_key(&db, &headers)?;
    let user = insert_user(&db, Uuid::new_v4(), input.user).await?;
    Ok(Json(json!({ "user": user })))
}

async fn create_user_with_id(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(input): Json<UserRequest>,
) -> Result<Json<Value>, Rejection> {
    require_api_key(&db, &headers)?;
    let user = insert_user(&db, id, input.user).await?;
    Ok(Json(json!({ "user": user })))
}

async fn get_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, Rejection> {
    require_api_key(&db, &headers)?;
    let users = db.users.read().await;
    let user = users.get(&id).ok_or(Rejection::NotFound)?;
    Ok(Json(json!({ "user": user })))
}

/// `GET /api/user` is either a lookup by email/loginId (API key) or the
/// owner of a Bearer access token.
async fn lookup_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(lookup): Query<UserLookup>,
) -> Result<Json<Value>, Rejection> {
    let users = db.users.read().await;
    let user = match token_subject(&headers, "Bearer") {
        Some(id) => users.get(&id),
        None => {
            require_api_key(&db, &headers)?;
            let wanted = lookup.email.or(lookup.login_id).ok_or(Rejection::NotFound)?;
            users.values().find(|u| u.email == wanted)
        }
    };
    let user = user.ok_or(Rejection::NotFound)?;
    Ok(Json(json!({ "user": user })))
}

async fn delete_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Rejection> {
    require_api_key(&db, &headers)?;
    db.users.write().await.remove(&id).ok_or(Rejection::NotFound)?;
    db.registrations.write().await.retain(|(user, _), _| *user != id);
    Ok(StatusCode::OK)
}

async fn register(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
    Json(input): Json<RegistrationRequest>,
) -> Result<Json<Value>, Rejection> {
    require_api_key(&db, &headers)?;
    if !db.users.read().await.contains_key(&user_id) {
        return Err(Rejection::NotFound);
    }
    let registration = input.registration;
    db.registrations
        .write()
        .await
        .insert((user_id, registration.application_id), registration.clone());
    Ok(Json(json!({ "registration": registration })))
}

async fn create_user_and_register(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CombinedRequest>,
) -> Result<Json<Value>, Rejection> {
    require_api_key(&db, &headers)?;
    let user = insert_user(&db, Uuid::new_v4(), input.user).await?;
    let registration = input.registration;
    db.registrations
        .write()
        .await
        .insert((user.id, registration.application_id), registration.clone());
    Ok(Json(json!({ "user": user, "registration": registration })))
}

async fn get_registration(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(key): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, Rejection> {
    require_api_key(&db, &headers)?;
    let registrations = db.registrations.read().await;
    let registration = registrations.get(&key).ok_or(Rejection::NotFound)?;
    Ok(Json(json!({ "registration": registration })))
}

async fn delete_registration(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(key): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, Rejection> {
    require_api_key(&db, &headers)?;
    db.registrations.write().await.remove(&key).ok_or(Rejection::NotFound)?;
    Ok(StatusCode::OK)
}

async fn login(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> Result<Json<Value>, Rejection> {
    require_api_key(&db, &headers)?;
    let users = db.users.read().await;
    let user = users
        .values()
        .find(|u| u.email == input.login_id && u.password == input.password)
        .ok_or(Rejection::NotFound)?;

    let mut body = json!({
        "token": format!("token-{}", user.id),
        "refreshToken": format!("refresh-{}", user.id),
        "user": user,
    });
    if let Some(app) = input.application_id {
        if let Some(registration) = db.registrations.read().await.get(&(user.id, app)) {
            body["registration"] = json!(registration);
        }
    }
    Ok(Json(body))
}

async fn login_instant(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, Rejection> {
    require_api_key(&db, &headers)?;
    if db.users.read().await.contains_key(&user_id) {
        Ok(StatusCode::OK)
    } else {
        Err(Rejection::NotFound)
    }
}

async fn login_instant_for_application(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((user_id, application_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, Rejection> {
    require_api_key(&db, &headers)?;
    if db.registrations.read().await.contains_key(&(user_id, application_id)) {
        Ok(StatusCode::OK)
    } else {
        Err(Rejection::NotFound)
    }
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> Result<StatusCode, Rejection> {
    require_api_key(&db, &headers)?;
    Ok(StatusCode::OK)
}

async fn issue_jwt(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, Rejection> {
    let id = token_subject(&headers, "Bearer").ok_or(Rejection::Unauthorized)?;
    if !db.users.read().await.contains_key(&id) {
        return Err(Rejection::Unauthorized);
    }
    Ok(Json(json!({ "token": format!("token-{id}") })))
}

async fn validate_jwt(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, Rejection> {
    let id = token_subject(&headers, "JWT").ok_or(Rejection::Unauthorized)?;
    let users = db.users.read().await;
    let user = users.get(&id).ok_or(Rejection::Unauthorized)?;
    Ok(Json(json!({ "jwt": { "sub": user.id, "email": user.email } })))
}

async fn refresh_jwt(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<RefreshRequest>,
) -> Result<Json<Value>, Rejection> {
    require_api_key(&db, &headers)?;
    let id: Uuid = input
        .refresh_token
        .strip_prefix("refresh-")
        .and_then(|s| s.parse().ok())
        .ok_or(Rejection::NotFound)?;
    if !db.users.read().await.contains_key(&id) {
        return Err(Rejection::NotFound);
    }
    Ok(Json(json!({
        "token": format!("token-{id}"),
        "refreshToken": input.refresh_token,
    })))
}

async fn report_totals(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<Value>), Rejection> {
    require_api_key(&db, &headers)?;
    let mut response_headers = HeaderMap::new();
    if let Some(tenant) = headers.get(TENANT_HEADER) {
        response_headers.insert(TENANT_HEADER, tenant.clone());
    }
    let global_count = db.users.read().await.len();
    Ok((
        response_headers,
        Json(json!({ "globalCount": global_count, "applicationTotals": {} })),
    ))
}

async fn report(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(name): Path<String>,
    Query(window): Query<ReportWindow>,
) -> Result<Json<Value>, Rejection> {
    require_api_key(&db, &headers)?;
    let mut errors = BTreeMap::new();
    if window.start.is_none() {
        field_error(&mut errors, "blank", "start");
    }
    if window.end.is_none() {
        field_error(&mut errors, "blank", "end");
    }
    if !errors.is_empty() {
        return Err(Rejection::Validation(errors));
    }
    match name.as_str() {
        "daily-active-user" => Ok(Json(json!({ "dailyActiveUsers": [], "total": 0 }))),
        "monthly-active-user" => Ok(Json(json!({ "monthlyActiveUsers": [], "total": 0 }))),
        "registration" | "login" => Ok(Json(json!({ "hourlyCounts": [], "total": 0 }))),
        _ => Err(Rejection::NotFound),
    }
}
