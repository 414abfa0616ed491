use std::sync::Arc;

use actix_web::web;

mod lead_forwarder;
mod rate_limiter;
mod reviews;

pub use lead_forwarder::{FormspreeForwarder, LeadForwarderTrait, NOT_CONFIGURED_MESSAGE};
#[cfg(test)]
pub use lead_forwarder::MockLeadForwarderTrait;
pub use rate_limiter::{RateLimitOptions, RateLimitStore};
pub use reviews::ReviewService;

/// Shared service instances, built once and handed to every worker
#[derive(Clone)]
pub struct Services {
    pub rate_limiter: web::Data<RateLimitStore>,
    pub reviews: web::Data<ReviewService>,
    pub lead_forwarder: web::Data<dyn LeadForwarderTrait>,
}

impl Services {
    pub fn new(
        rate_limiter: RateLimitStore,
        reviews: ReviewService,
        lead_forwarder: Arc<dyn LeadForwarderTrait>,
    ) -> Self {
        Self {
            rate_limiter: web::Data::new(rate_limiter),
            reviews: web::Data::new(reviews),
            lead_forwarder: web::Data::from(lead_forwarder),
        }
    }
}

/// Service Register
pub fn register(services: &Services, cfg: &mut web::ServiceConfig) {
    cfg.app_data(services.rate_limiter.clone())
        .app_data(services.reviews.clone())
        .app_data(services.lead_forwarder.clone());
}
