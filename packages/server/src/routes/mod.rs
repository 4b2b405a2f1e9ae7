use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/resources", resource_routes())
        .nest("/upload", upload_routes(config))
        .nest("/courses", course_routes())
}

fn resource_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::resource::list_resources))
        .routes(routes!(handlers::resource::resource_stats))
        .routes(routes!(handlers::resource::list_categories))
}

fn upload_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::upload::upload_resource))
        .layer(handlers::upload::upload_body_limit(&config.upload))
}

fn course_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::course::list_courses,
        handlers::course::create_taxonomy_item
    ))
}
