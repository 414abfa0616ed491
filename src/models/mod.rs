pub mod lead;
pub mod places;
pub mod review;

pub use lead::{LeadForm, LeadSubmissionResponse};
pub use places::{
    LegacyDetailsResponse, LegacyFindPlaceResponse, PlaceDetails, V1DetailsResponse,
    V1SearchResponse,
};
pub use review::{ReviewOrder, ReviewSummary};
