// Domain layer: wire-level models and the ports the client talks through.

pub mod model;
pub mod ports;
