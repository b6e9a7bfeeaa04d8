// Domain layer: scan result model and the seams (traits) the pipeline is built on.

pub mod model;
pub mod ports;
