pub mod backend;
pub mod bench;
pub mod matrix;
pub mod util;

extern crate rand;
extern crate rand_distr;
