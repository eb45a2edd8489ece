// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::{auth_guard, require_admin, require_technician};
use crate::models::auth::Role;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("Migrações do banco de dados executadas com sucesso.");

    seed_admin(&app_state)
        .await
        .expect("Falha ao criar o usuário administrador inicial.");

    // Rotas públicas de autenticação.
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/register", post(handlers::auth::register))
        .route("/validate", get(handlers::auth::validate));

    // Qualquer usuário autenticado pode consultar as próprias permissões.
    let authorization_routes = Router::new()
        .route(
            "/has-permission",
            get(handlers::authorization::check_permission),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Produtores, grupos familiares e bens: TECHNICIAN ou ADMIN.
    let farmer_routes = Router::new()
        .route(
            "/",
            get(handlers::farmer::list_farmers).post(handlers::farmer::create_farmer),
        )
        .route("/available", get(handlers::farmer::list_available_farmers))
        .route("/types", get(handlers::farmer::list_farmer_types))
        .route(
            "/technician/none",
            get(handlers::farmer::list_farmers_without_technician),
        )
        .route(
            "/technician/{technicianId}",
            get(handlers::farmer::list_farmers_by_technician),
        )
        .route("/type/{typeId}", get(handlers::farmer::list_farmers_by_type))
        .route(
            "/branch/{branchId}",
            get(handlers::farmer::list_farmers_by_branch),
        )
        .route(
            "/{registrationNumber}",
            get(handlers::farmer::get_farmer).put(handlers::farmer::update_farmer),
        );

    let family_group_routes = Router::new()
        .route(
            "/",
            get(handlers::family_group::list_family_groups)
                .post(handlers::family_group::create_family_group),
        )
        .route(
            "/technician/{technicianId}/cultivations",
            get(handlers::family_group::list_cultivations_by_technician),
        )
        .route(
            "/branch/{branchId}/cultivations",
            get(handlers::family_group::list_cultivations_by_branch),
        )
        .route(
            "/member/{registrationNumber}",
            get(handlers::family_group::get_group_of_member),
        )
        .route("/{id}", get(handlers::family_group::get_family_group))
        .route("/{id}/members", get(handlers::family_group::list_members))
        .route(
            "/{id}/total-area",
            get(handlers::family_group::get_total_area),
        )
        .route("/{id}/lessors", get(handlers::family_group::list_lessors))
        .route(
            "/{id}/cultivation",
            get(handlers::family_group::get_cultivation)
                .put(handlers::family_group::update_cultivation),
        )
        .route("/{id}/free-area", get(handlers::family_group::get_free_area))
        .route("/{id}/registry", put(handlers::family_group::update_registry))
        .route(
            "/{id}/member/{registrationNumber}",
            put(handlers::family_group::add_member)
                .delete(handlers::family_group::remove_member),
        )
        .route(
            "/{id}/principal/{registrationNumber}",
            put(handlers::family_group::change_principal),
        );

    let asset_routes = Router::new()
        .route("/", post(handlers::asset::create_asset))
        .route("/types", get(handlers::asset::list_asset_types))
        .route("/categories", get(handlers::asset::list_asset_categories))
        .route("/lease", post(handlers::asset::lease_asset))
        .route("/unlease", post(handlers::asset::unlease_asset))
        .route(
            "/owner/{registrationNumber}",
            get(handlers::asset::list_assets_by_owner),
        )
        .route(
            "/owner/{registrationNumber}/available",
            get(handlers::asset::list_available_assets_by_owner),
        )
        .route(
            "/lessee/{registrationNumber}",
            get(handlers::asset::list_assets_by_lessee),
        )
        .route(
            "/{assetId}",
            get(handlers::asset::get_asset)
                .put(handlers::asset::update_asset)
                .delete(handlers::asset::delete_asset),
        );

    let technician_routes = Router::new()
        .nest("/farmer", farmer_routes)
        .nest("/family-group", family_group_routes)
        .nest("/asset", asset_routes)
        .layer(axum_middleware::from_fn(require_technician))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Usuários, carteiras e cargas: apenas ADMIN.
    let user_routes = Router::new()
        .route(
            "/",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route("/all", get(handlers::user::list_all_users))
        .route(
            "/{id}",
            get(handlers::user::get_user).put(handlers::user::update_user),
        );

    let branch_routes = Router::new()
        .route(
            "/",
            get(handlers::branch::list_branches).post(handlers::branch::create_branch),
        )
        .route("/all", get(handlers::branch::list_all_branches))
        .route(
            "/{id}",
            get(handlers::branch::get_branch).put(handlers::branch::update_branch),
        );

    let upload_routes = Router::new()
        .route("/", post(handlers::upload::upload_file))
        .route("/status/{jobId}", get(handlers::upload::job_status));

    let admin_routes = Router::new()
        .nest("/user", user_routes)
        .nest("/branch", branch_routes)
        .nest("/upload", upload_routes)
        .layer(axum_middleware::from_fn(require_admin))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/auth", auth_routes)
        .nest("/authorization", authorization_routes)
        .merge(technician_routes)
        .merge(admin_routes)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", docs::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state.clone());

    let listener = TcpListener::bind(&app_state.bind_addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!(
        "Servidor escutando em {}",
        listener.local_addr().expect("endereço local indisponível")
    );
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}

/// Garante que exista um administrador inicial (admin/admin) para o
/// primeiro acesso.
async fn seed_admin(app_state: &AppState) -> anyhow::Result<()> {
    let users = db::UserRepository::new();

    if users
        .find_by_username(&app_state.pool, "admin")
        .await?
        .is_some()
    {
        return Ok(());
    }

    let password_hash = services::user_service::hash_password("admin".to_string()).await?;
    users
        .create(
            &app_state.pool,
            "admin",
            "Administrador",
            &password_hash,
            &[Role::Admin],
            None,
        )
        .await?;

    tracing::info!("Usuário 'admin' criado. Troque a senha no primeiro acesso.");
    Ok(())
}
