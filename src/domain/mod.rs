// Domain layer: showtime models and the ports the chain clients plug into.

pub mod model;
pub mod ports;
