//! Domain types: trip requests, itineraries and the session slot

mod itinerary;
mod session;
mod trip;

pub use itinerary::Itinerary;
pub use session::{SessionEntry, SessionState};
pub use trip::{
    BudgetLevel, DEFAULT_DURATION_DAYS, MAX_DURATION_DAYS, MIN_DURATION_DAYS, TravelGroup, TripRequest,
    ValidationError,
};
