// Domain layer: report models and the capability ports the pipeline depends on.

pub mod model;
pub mod ports;
