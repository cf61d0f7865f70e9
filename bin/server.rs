// Vendor Directory - Web Server
// REST API with Axum over the same store the CLI uses

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use vendor_directory::{
    display_rating, init_tracing, star_glyphs, Category, Config, Directory, DirectoryError,
    FilterQuery, Greeting, MemberProfile, SqliteStore, VendorCard, VendorFilter,
    VendorSubmission, NO_RESULTS_MESSAGE,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    directory: Arc<Mutex<Directory<SqliteStore>>>,
}

impl AppState {
    fn directory(&self) -> Result<MutexGuard<'_, Directory<SqliteStore>>, ApiError> {
        self.directory.lock().map_err(|_| ApiError::Poisoned)
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

enum ApiError {
    Directory(DirectoryError),
    Poisoned,
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        ApiError::Directory(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Directory(err) => {
                let status = match &err {
                    DirectoryError::DuplicateUsername | DirectoryError::AlreadySaved => {
                        StatusCode::CONFLICT
                    }
                    DirectoryError::InvalidCredentials | DirectoryError::NotLoggedIn(_) => {
                        StatusCode::UNAUTHORIZED
                    }
                    DirectoryError::MissingField(_) | DirectoryError::InvalidRating(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    DirectoryError::UnknownVendor(_) => StatusCode::NOT_FOUND,
                    DirectoryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    error!("store failure: {}", err);
                }
                (status, err.to_string())
            }
            ApiError::Poisoned => {
                error!("directory lock poisoned");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = ApiResponse {
            success: false,
            data: (),
            message: Some(message),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Deserialize)]
struct Credentials {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
struct NameEmail {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
struct RatingRequest {
    stars: i64,
}

#[derive(Deserialize)]
struct FavoriteRequest {
    vendor: String,
}

#[derive(Serialize)]
struct RatingResponse {
    vendor: String,
    average: f64,
    display: f64,
    stars: String,
}

#[derive(Serialize)]
struct SessionResponse {
    username: Option<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/vendors?category=&search=&location= - Filtered vendor cards
async fn list_vendors(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> ApiResult<Vec<VendorCard>> {
    let directory = state.directory()?;
    let cards = directory.vendor_cards(&VendorFilter::from(&query))?;

    if cards.is_empty() {
        return Ok(Json(ApiResponse::with_message(cards, NO_RESULTS_MESSAGE)));
    }
    Ok(Json(ApiResponse::ok(cards)))
}

/// POST /api/vendors - Add a listing (vendor session required)
async fn add_vendor(
    State(state): State<AppState>,
    Json(submission): Json<VendorSubmission>,
) -> ApiResult<vendor_directory::Vendor> {
    let mut directory = state.directory()?;
    let vendor = directory.submit_vendor(&submission)?;
    Ok(Json(ApiResponse::with_message(
        vendor,
        "Vendor added successfully.",
    )))
}

/// GET /api/categories - Category cards, "All" first
async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let directory = state.directory()?;
    Ok(Json(ApiResponse::ok(directory.categories())))
}

/// GET /api/vendors/:name/rating
async fn get_rating(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<RatingResponse> {
    let directory = state.directory()?;
    directory.vendor(&name)?;
    let average = directory.average_rating(&name)?;

    Ok(Json(ApiResponse::ok(RatingResponse {
        display: display_rating(average),
        stars: star_glyphs(average),
        vendor: name,
        average,
    })))
}

/// POST /api/vendors/:name/rating - Record a 1-5 star rating
async fn rate_vendor(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<RatingRequest>,
) -> ApiResult<RatingResponse> {
    let mut directory = state.directory()?;
    let average = directory.rate(&name, request.stars)?;

    Ok(Json(ApiResponse::ok(RatingResponse {
        display: display_rating(average),
        stars: star_glyphs(average),
        vendor: name,
        average,
    })))
}

/// POST /api/vendor/signup
async fn vendor_signup(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<()> {
    let mut directory = state.directory()?;
    directory.signup(&credentials.username, &credentials.password)?;
    Ok(Json(ApiResponse::with_message(
        (),
        "Account created! Please log in.",
    )))
}

/// POST /api/vendor/login
async fn vendor_login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<SessionResponse> {
    let mut directory = state.directory()?;
    let username = directory.vendor_login(&credentials.username, &credentials.password)?;
    Ok(Json(ApiResponse::ok(SessionResponse {
        username: Some(username),
    })))
}

/// POST /api/vendor/logout
async fn vendor_logout(State(state): State<AppState>) -> ApiResult<SessionResponse> {
    let mut directory = state.directory()?;
    directory.vendor_logout()?;
    Ok(Json(ApiResponse::ok(SessionResponse { username: None })))
}

/// GET /api/vendor/session
async fn vendor_session(State(state): State<AppState>) -> ApiResult<SessionResponse> {
    let directory = state.directory()?;
    Ok(Json(ApiResponse::ok(SessionResponse {
        username: directory.current_vendor()?,
    })))
}

/// POST /api/member/login
async fn member_login(
    State(state): State<AppState>,
    Json(body): Json<NameEmail>,
) -> ApiResult<MemberProfile> {
    let mut directory = state.directory()?;
    let profile = directory.member_login(&body.name, &body.email)?;
    Ok(Json(ApiResponse::with_message(
        profile,
        "Welcome! Your profile has been saved.",
    )))
}

/// GET /api/member - Current profile (null when logged out)
async fn get_member(State(state): State<AppState>) -> ApiResult<Option<MemberProfile>> {
    let directory = state.directory()?;
    Ok(Json(ApiResponse::ok(directory.member()?)))
}

/// POST /api/member/favorites
async fn add_favorite(
    State(state): State<AppState>,
    Json(request): Json<FavoriteRequest>,
) -> ApiResult<MemberProfile> {
    let mut directory = state.directory()?;
    let profile = directory.save_favorite(&request.vendor)?;
    Ok(Json(ApiResponse::with_message(
        profile,
        "Vendor saved successfully!",
    )))
}

/// POST /api/member/contacts
async fn add_contact(
    State(state): State<AppState>,
    Json(body): Json<NameEmail>,
) -> ApiResult<MemberProfile> {
    let mut directory = state.directory()?;
    let profile = directory.add_contact(&body.name, &body.email)?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// POST /api/member/logout
async fn member_logout(State(state): State<AppState>) -> ApiResult<()> {
    let mut directory = state.directory()?;
    directory.member_logout()?;
    Ok(Json(ApiResponse::ok(())))
}

/// GET /api/greeting
async fn get_greeting(State(state): State<AppState>) -> ApiResult<Option<Greeting>> {
    let directory = state.directory()?;
    let greeting = directory.greeting()?;
    let message = greeting.as_ref().map(Greeting::message);

    Ok(Json(ApiResponse {
        success: true,
        data: greeting,
        message,
    }))
}

/// POST /api/greeting - Legacy profile form
async fn save_greeting(
    State(state): State<AppState>,
    Json(body): Json<NameEmail>,
) -> ApiResult<Greeting> {
    let mut directory = state.directory()?;
    let greeting = directory.save_greeting(&body.name, &body.email)?;
    let message = greeting.message();
    Ok(Json(ApiResponse::with_message(greeting, message)))
}

// ============================================================================
// Main Server
// ============================================================================

fn router(state: AppState, web_dir: &std::path::Path) -> Router {
    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/vendors", get(list_vendors).post(add_vendor))
        .route("/vendors/:name/rating", get(get_rating).post(rate_vendor))
        .route("/categories", get(list_categories))
        .route("/vendor/signup", post(vendor_signup))
        .route("/vendor/login", post(vendor_login))
        .route("/vendor/logout", post(vendor_logout))
        .route("/vendor/session", get(vendor_session))
        .route("/member", get(get_member))
        .route("/member/login", post(member_login))
        .route("/member/favorites", post(add_favorite))
        .route("/member/contacts", post(add_contact))
        .route("/member/logout", post(member_logout))
        .route("/greeting", get(get_greeting).post(save_greeting))
        .with_state(state);

    // Build main router
    Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(web_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");
    let config = Config::load();

    info!("🌐 Vendor Directory - Web Server");

    let store = SqliteStore::open(&config.db_path)?;
    let directory = Directory::open(store)?;
    info!(
        db = ?config.db_path,
        vendors = directory.catalogue().len(),
        "store opened"
    );

    // Create shared state
    let state = AppState {
        directory: Arc::new(Mutex::new(directory)),
    };

    let app = router(state, &config.web_dir);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🚀 Server running on http://localhost:{}", config.port);
    info!("   API: http://localhost:{}/api/vendors", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
