// Domain layer: COBRA-style model objects and the ports the client talks through.

pub mod model;
pub mod ports;
