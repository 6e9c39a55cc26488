//! Static content page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Query, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalCustomer;
use crate::models::SignedInCustomer;
use crate::routes::NoticeQuery;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub customer: Option<SignedInCustomer>,
    pub notice: Option<String>,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub customer: Option<SignedInCustomer>,
    pub notice: Option<String>,
}

/// Display the About page.
#[instrument(skip(customer))]
pub async fn about(
    OptionalCustomer(customer): OptionalCustomer,
    Query(query): Query<NoticeQuery>,
) -> impl IntoResponse {
    AboutTemplate {
        customer,
        notice: query.notice,
    }
}

/// Display the Contact page.
#[instrument(skip(customer))]
pub async fn contact(
    OptionalCustomer(customer): OptionalCustomer,
    Query(query): Query<NoticeQuery>,
) -> impl IntoResponse {
    ContactTemplate {
        customer,
        notice: query.notice,
    }
}
