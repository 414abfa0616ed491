use actix_web::{web, HttpResponse, Responder};

use crate::{
    handlers::{
        pm_onboarding_testimonials_handler, robots_handler, submit_lead_handler,
        testimonials_handler,
    },
    types::{AppState, HealthStatus, ResponsePayload},
};

// Handler function for the root route "/"
async fn index() -> impl Responder {
    let welcome_message = ResponsePayload {
        status: 200,
        message: String::from("Blue Bunny turnover services API"),
    };

    HttpResponse::Ok().json(welcome_message)
}

// Handler function for the health check endpoint
async fn health_check(data: web::Data<AppState>) -> impl Responder {
    let status = HealthStatus {
        status: String::from("OK"),
        version: data.version.clone(),
        uptime_seconds: data.start_time.elapsed().as_secs(),
    };

    HttpResponse::Ok().json(status)
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index));
    cfg.route("/health", web::get().to(health_check));
    cfg.route("/robots.txt", web::get().to(robots_handler));
    cfg.service(
        web::scope("/api")
            .route("/leads", web::post().to(submit_lead_handler))
            .route("/testimonials", web::get().to(testimonials_handler))
            .route(
                "/pm-onboarding/testimonials",
                web::get().to(pm_onboarding_testimonials_handler),
            ),
    );
}
