// Domain layer: display models, protocol messages and ports. No I/O here.

pub mod message;
pub mod model;
pub mod ports;
