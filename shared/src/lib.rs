pub mod error;
pub mod gemini;
pub mod map;
pub mod model;
pub mod state;

pub use error::{GENERIC_FAILURE_MESSAGE, QueryError};
pub use model::{Attraction, AttractionId, Category, Coordinate, RouteRequest};
pub use state::{AppState, Applied, ListState, QueryStatus, QueryToken};
