use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

/// Registers the bearer scheme used by admin routes
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_jwt",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::events::list_events,
        crate::routes::events::get_event,
        crate::routes::calendar::month_grid,
        crate::routes::calendar::day_detail,
        crate::routes::cities::search_cities,
        crate::routes::auth::login,
        crate::routes::admin::list_events,
        crate::routes::admin::create_event,
        crate::routes::admin::update_event,
        crate::routes::admin::delete_event,
        crate::routes::admin::import_events,
        crate::routes::uploads::upload_flyer,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::health::HealthResponse,
            crate::routes::calendar::DayDetail,
            crate::routes::auth::LoginRequest,
            crate::routes::auth::LoginResponse,
            crate::routes::admin::ImportResponse,
            crate::routes::uploads::UploadResponse,
            whatsfest_core::models::Event,
            whatsfest_core::models::EventDraft,
            whatsfest_core::models::EventPatch,
            whatsfest_core::legacy::EventRecord,
            whatsfest_core::MonthGrid,
            whatsfest_core::GridCell,
        )
    ),
    tags(
        (name = "events", description = "Public event listing"),
        (name = "calendar", description = "Month grid and day detail"),
        (name = "cities", description = "City autocomplete"),
        (name = "auth", description = "Admin login"),
        (name = "admin", description = "Event management")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes_and_scheme() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/events",
            "/api/calendar/{year}/{month}",
            "/api/calendar/{year}/{month}/{day}",
            "/api/admin/events/{id}",
            "/api/admin/uploads",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("admin_jwt"));
    }
}
