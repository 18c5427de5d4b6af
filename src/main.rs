use axum::{
    middleware,
    routing::{get, get_service, post},
    Router,
};
use dotenvy::dotenv;
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use campus_activities::web::middleware::auth as auth_middleware;
use campus_activities::web::routes::{activities, admin, auth, public, reviewer};

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://campus.db?mode=rwc".to_string());
    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("cannot connect to the database");
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("database migrations failed");

    // Signed-in area: any session.
    let protected_routes = Router::new()
        .route(
            "/create_activity",
            get(activities::create_activity_page).post(activities::create_activity_handler),
        )
        .route(
            "/activity/:activity_id/edit",
            get(activities::edit_activity_page).post(activities::edit_activity_handler),
        )
        .route(
            "/activity/:activity_id/delete",
            post(activities::delete_activity_handler),
        )
        .route(
            "/activity/:activity_id/join",
            post(activities::join_activity_handler),
        )
        .route(
            "/activity/:activity_id/quit",
            post(activities::quit_activity_handler),
        )
        .route(
            "/activity/:activity_id/comment",
            post(activities::comment_handler),
        )
        .route(
            "/activity/:activity_id/export",
            get(activities::export_handler),
        )
        .route("/my_activities", get(activities::my_activities_handler))
        .route("/profile", get(activities::profile_handler))
        .route("/logout", post(auth::logout_handler))
        .layer(middleware::from_fn(auth_middleware::require_auth));

    // Review area: reviewers only.
    let reviewer_routes = Router::new()
        .route("/review/list", get(reviewer::review_list_handler))
        .route("/review/history", get(reviewer::review_history_handler))
        .route(
            "/review/:activity_id",
            get(reviewer::review_page).post(reviewer::review_handler),
        )
        .layer(middleware::from_fn(auth_middleware::require_reviewer))
        .layer(middleware::from_fn(auth_middleware::require_auth));

    // Admin area.
    let admin_routes = Router::new()
        .route("/dashboard", get(admin::dashboard_handler))
        .route("/users", get(admin::users_handler))
        .route("/users/:user_id/role", post(admin::change_role_handler))
        .route("/venues", get(admin::venues_handler))
        .route("/venues/new", post(admin::create_venue_handler))
        .route("/venues/:venue_id/edit", post(admin::update_venue_handler))
        .route(
            "/venues/:venue_id/delete",
            post(admin::delete_venue_handler),
        )
        .route("/activity_types", get(admin::activity_types_handler))
        .route(
            "/activity_types/new",
            post(admin::create_activity_type_handler),
        )
        .route(
            "/activity_types/:type_id/edit",
            post(admin::update_activity_type_handler),
        )
        .route(
            "/activity_types/:type_id/delete",
            post(admin::delete_activity_type_handler),
        )
        .layer(middleware::from_fn(auth_middleware::require_admin))
        .layer(middleware::from_fn(auth_middleware::require_auth));

    let pages = Router::new()
        .route("/", get(public::index_handler))
        .route("/activity/:activity_id", get(public::activity_detail_handler))
        .route("/activity/:activity_id/like", post(public::like_handler))
        .route("/login", get(auth::login_page).post(auth::login_handler))
        .route(
            "/register",
            get(auth::register_page).post(auth::register_handler),
        )
        .merge(protected_routes)
        .merge(reviewer_routes)
        .nest("/admin", admin_routes)
        .layer(middleware::from_fn_with_state(
            pool.clone(),
            auth_middleware::load_user,
        ));

    let app = pages
        .nest_service(
            "/assets",
            get_service(ServeDir::new("assets")).layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            )),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(pool);

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("invalid HOST/PORT");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("cannot bind listen address");
    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app).await.unwrap();
}
