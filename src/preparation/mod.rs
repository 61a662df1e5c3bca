pub(crate) mod coerce;
pub mod coordinates;
pub mod error;
pub mod pipeline;
pub mod traffic_frame;
