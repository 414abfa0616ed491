use actix_web::{web, HttpResponse, Responder};

use crate::{models::ReviewOrder, services::ReviewService, types::AppState};

async fn summary_response(
    order: ReviewOrder,
    service: &ReviewService,
    state: &AppState,
) -> HttpResponse {
    let summary = service.get_reviews_data(order).await;
    let summary = if state.environment.exposes_diagnostics() {
        summary
    } else {
        summary.without_diagnostics()
    };
    HttpResponse::Ok().json(summary)
}

/// Home page testimonials, upstream order
pub async fn testimonials_handler(
    service: web::Data<ReviewService>,
    state: web::Data<AppState>,
) -> impl Responder {
    summary_response(ReviewOrder::Upstream, &service, &state).await
}

/// PM onboarding landing page testimonials, newest first
pub async fn pm_onboarding_testimonials_handler(
    service: web::Data<ReviewService>,
    state: web::Data<AppState>,
) -> impl Responder {
    summary_response(ReviewOrder::NewestFirst, &service, &state).await
}
