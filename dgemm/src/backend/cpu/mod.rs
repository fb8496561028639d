mod backend;
pub mod math;

pub use backend::*;
pub use math::max_abs_diff;
