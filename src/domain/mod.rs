// Domain layer: sector geometry, load classification, models and ports.
// Nothing in here performs I/O.

pub mod geodesy;
pub mod model;
pub mod ports;
pub mod sector;
pub mod severity;
