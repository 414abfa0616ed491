mod places;
mod places_legacy;
mod places_v1;

pub use places::{PlacesGeneration, PlacesRepositoryTrait};
pub use places_legacy::LegacyPlacesRepository;
pub use places_v1::PlacesV1Repository;

#[cfg(test)]
pub use places::MockPlacesRepositoryTrait;
