pub mod app;
pub mod assistant;
pub mod cities;
pub mod error;
pub mod estimator;
pub mod format;
pub mod geo;
pub mod order;
pub mod presentation;
pub mod resolver;
pub mod session;
pub mod status;

pub use app::{AppState, ChatMessage, PendingReply, Speaker};
pub use error::{FormError, StorageError};
pub use estimator::{
    DistanceSource, EstimateRequest, PaymentMethod, RouteForm, SimulationResult, Tariff, estimate,
};
pub use geo::{Coordinate, RouteBounds, haversine_km};
pub use presentation::{DisplayPort, DisplayRegion, MapPort, MapViewport, render_simulation};
pub use resolver::resolve_location;
pub use status::{DeliveryStage, StatusAnimator, StatusTicket};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ApiError {
    pub message: String,
}
