// src/models/lead.rs - Lead form submissions
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validations::{validate_email_address, validate_phone, validate_zip_code};

/// Hidden `leadType` prefix sent by the property-manager landing page
pub const PM_ONBOARDING_LEAD_TYPE: &str = "PM Onboarding";

/// Which form produced a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadKind {
    /// Hero "Get a Quote" form on the home page
    Quote,
    /// Property-manager onboarding form
    PmOnboarding,
}

/// Decoded view over a form-encoded body; the raw bytes are what gets forwarded
#[derive(Debug, Clone, Default)]
pub struct LeadForm {
    fields: Vec<(String, String)>,
}

impl LeadForm {
    pub fn from_urlencoded(body: &[u8]) -> Self {
        Self {
            fields: url::form_urlencoded::parse(body).into_owned().collect(),
        }
    }

    /// First value for `name`, trimmed; blank values count as absent
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn kind(&self) -> LeadKind {
        match self.get("leadType") {
            Some(lead_type) if lead_type.starts_with(PM_ONBOARDING_LEAD_TYPE) => {
                LeadKind::PmOnboarding
            }
            _ => LeadKind::Quote,
        }
    }

    fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    /// Checks the fields the originating form requires
    pub fn validate(&self) -> Result<LeadKind, validator::ValidationErrors> {
        let kind = self.kind();
        match kind {
            LeadKind::Quote => QuoteLead::from(self).validate()?,
            LeadKind::PmOnboarding => PmOnboardingLead::from(self).validate()?,
        }
        Ok(kind)
    }
}

#[derive(Debug, Validate)]
pub struct QuoteLead {
    #[validate(custom(function = "validate_zip_code"))]
    pub zip_code: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[validate(custom(function = "validate_email_address"))]
    pub email: String,

    #[validate(required(message = "Please confirm consent before submitting."))]
    pub consent: Option<String>,
}

impl From<&LeadForm> for QuoteLead {
    fn from(form: &LeadForm) -> Self {
        Self {
            zip_code: form.text("zipCode"),
            phone: form.text("phone"),
            email: form.text("email"),
            consent: form.get("consent").map(str::to_string),
        }
    }
}

#[derive(Debug, Validate)]
pub struct PmOnboardingLead {
    #[validate(custom(
        function = "validate_phone",
        message = "Phone number must include at least 10 digits."
    ))]
    pub phone: String,

    #[validate(custom(function = "validate_email_address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Enter a service area or zip code."))]
    pub service_area: String,

    #[validate(length(min = 1, message = "Select your portfolio size."))]
    pub portfolio_size: String,

    #[validate(length(min = 1, message = "Select your PMS or calendar type."))]
    pub pms_type: String,

    #[validate(required(message = "Please confirm consent before submitting."))]
    pub consent: Option<String>,
}

impl From<&LeadForm> for PmOnboardingLead {
    fn from(form: &LeadForm) -> Self {
        Self {
            phone: form.text("phone"),
            email: form.text("email"),
            service_area: form.text("serviceArea"),
            portfolio_size: form.text("portfolioSize"),
            pms_type: form.text("pmsType"),
            consent: form.get("consent").map(str::to_string),
        }
    }
}

/// Body returned to the browser after a submission attempt
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LeadSubmissionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LeadSubmissionResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}
