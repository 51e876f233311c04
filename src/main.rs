use anyhow::Context;
use axum::http::Method;
use std::sync::Arc;
use student_records::config::{AppConfig, StoreBackend};
use student_records::mongo::MongoStore;
use student_records::observability::init_tracing;
use student_records::routes::{create_router, AppState};
use student_records::store::{InMemoryStore, StudentStore};
use student_records::types::StudentForm;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        student_records::handlers::list_students,
        student_records::handlers::new_student_form,
        student_records::handlers::create_student,
        student_records::handlers::show_student,
        student_records::handlers::edit_student_form,
        student_records::handlers::update_student,
        student_records::handlers::delete_student
    ),
    components(schemas(StudentForm)),
    tags(
        (name = "Students", description = "Server-rendered student record pages")
    ),
    info(
        title = "Student Records",
        description = "CRUD pages for student records backed by MongoDB",
        version = "1.0.0"
    )
)]
struct ApiDoc;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env().context("reading configuration")?;

    let store: Arc<dyn StudentStore> = match config.store.backend {
        StoreBackend::Mongo => {
            let store = MongoStore::connect(&config.store)
                .await
                .with_context(|| format!("connecting to {}", config.store.uri))?;
            match store.ping().await {
                Ok(()) => info!("Connected to MongoDB at {}", config.store.uri),
                Err(e) => warn!("MongoDB at {} not reachable yet: {}", config.store.uri, e),
            }
            Arc::new(store)
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory store; records are lost on exit");
            Arc::new(InMemoryStore::new())
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let state = Arc::new(AppState::new(store.clone()));
    let app = create_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server running on http://{}", addr);
    info!("Student pages: http://{}/students", addr);
    info!("Swagger UI: http://{}/swagger-ui/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    store.shutdown().await;
    info!("Server stopped");
    Ok(())
}
