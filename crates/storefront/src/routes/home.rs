//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalCustomer;
use crate::models::{Meal, SignedInCustomer};
use crate::routes::NoticeQuery;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Menu in display order.
    pub meals: Vec<Meal>,
    /// Signed-in customer, if any.
    pub customer: Option<SignedInCustomer>,
    /// One-shot notice banner.
    pub notice: Option<String>,
}

/// Display the home page with the full menu.
#[instrument(skip(state, customer))]
pub async fn home(
    State(state): State<AppState>,
    OptionalCustomer(customer): OptionalCustomer,
    Query(query): Query<NoticeQuery>,
) -> impl IntoResponse {
    HomeTemplate {
        meals: state.catalog().meals().to_vec(),
        customer,
        notice: query.notice,
    }
}
