//! City autocomplete

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use utoipa::IntoParams;
use whatsfest_core::cities::DEFAULT_SEARCH_LIMIT;

use crate::AppState;

/// Upper bound on `limit`
pub const MAX_SEARCH_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CityQuery {
    /// Text typed so far
    pub q: Option<String>,
    /// Maximum number of suggestions (default 10, at most 50)
    pub limit: Option<usize>,
}

impl CityQuery {
    fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT)
    }
}

/// Suggest "City (ST)" labels for a partial name
#[utoipa::path(
    get,
    path = "/api/cities",
    params(CityQuery),
    responses(
        (status = 200, description = "Ranked suggestions", body = Vec<String>)
    ),
    tag = "cities"
)]
pub async fn search_cities(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Json<Vec<String>> {
    let needle = query.q.as_deref().unwrap_or("").trim().to_lowercase();
    if needle.is_empty() {
        return Json(Vec::new());
    }
    let limit = query.limit();

    let cities = state.cities.clone();
    let key = format!("{}|{}", needle, limit);
    let suggestions = state
        .city_cache
        .get_with(key, async move { cities.search(&needle, limit) })
        .await;

    Json(suggestions)
}

/// City routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/cities", get(search_cities))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_clamped() {
        let q = |limit| CityQuery {
            q: Some("sa".into()),
            limit,
        };
        assert_eq!(q(None).limit(), DEFAULT_SEARCH_LIMIT);
        assert_eq!(q(Some(0)).limit(), 1);
        assert_eq!(q(Some(3)).limit(), 3);
        assert_eq!(q(Some(10_000)).limit(), MAX_SEARCH_LIMIT);
    }
}
