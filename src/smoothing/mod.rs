pub mod exponential;
pub mod math;

pub use exponential::{AngularSmoother, ExponentialSmoother};
pub use math::{
    circular_mean_degrees, normalize_degrees, polar_to_cartesian, shortest_angular_delta,
};
