//! Runtime adapters and API surface.

pub mod api;
pub mod tokio_spawner;

pub use api::{
    health, join_waiting_list, queue_position, release_offer, resource_availability,
    AvailabilityResponse, ErrorResponse, Health, JoinRequest, JoinResponse, PositionResponse,
    ReleaseRequest,
};
pub use tokio_spawner::TokioSpawner;
