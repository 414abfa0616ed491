use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::{debug, info};

use crate::{
    errors::AppError,
    models::{LeadForm, LeadSubmissionResponse},
    services::{LeadForwarderTrait, RateLimitOptions, RateLimitStore, NOT_CONFIGURED_MESSAGE},
    types::Result,
    utils::client_identifier,
};

/// Lead submission handler
///
/// Checked in order: forwarding configured, rate limit, form fields. Only then
/// is the untouched body relayed upstream.
pub async fn submit_lead_handler(
    req: HttpRequest,
    body: web::Bytes,
    forwarder: web::Data<dyn LeadForwarderTrait>,
    rate_limiter: web::Data<RateLimitStore>,
) -> Result<impl Responder> {
    if !forwarder.is_configured() {
        return Err(AppError::Config(NOT_CONFIGURED_MESSAGE.to_string()));
    }

    let identifier = client_identifier(req.headers());
    let decision = rate_limiter.check_rate_limit(&identifier, RateLimitOptions::default());
    if decision.limited {
        info!(
            "Lead submission from '{}' throttled for {}ms",
            identifier, decision.retry_after_ms
        );
        return Err(AppError::RateLimited {
            retry_after_secs: decision.retry_after_secs(),
        });
    }

    let kind = LeadForm::from_urlencoded(&body).validate()?;
    debug!("Forwarding {:?} lead from '{}'", kind, identifier);

    forwarder.forward(body).await?;
    Ok(HttpResponse::Ok().json(LeadSubmissionResponse::ok()))
}
