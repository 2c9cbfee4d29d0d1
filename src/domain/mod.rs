// Domain layer: value types, the fingerprint deriver and the ports collaborators implement.

pub mod fingerprint;
pub mod model;
pub mod ports;
