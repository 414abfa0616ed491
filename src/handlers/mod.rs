mod leads;
mod site;
mod testimonials;

pub use leads::submit_lead_handler;
pub use site::robots_handler;
pub use testimonials::{pm_onboarding_testimonials_handler, testimonials_handler};
