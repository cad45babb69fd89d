// Domain layer: holding/patron models, batch request shapes and ports (interfaces).

pub mod model;
pub mod ports;
pub mod request;
