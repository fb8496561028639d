use crate::matrix::Matrix;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};

pub const SIZE_LG: usize = 1024;
pub const SIZE_MD: usize = 512;
pub const SIZE_SM: usize = 128;
const SEED: u64 = 0x8371943;

pub fn random_matrix(rng: &mut StdRng, size: usize) -> Matrix {
    let data: Vec<f64> = StandardNormal.sample_iter(rng).take(size * size).collect();
    Matrix::from_vec(size, data)
}

/// Deterministic `[A, B, C]` triple drawn from a standard normal distribution.
pub fn get_square_matrices(size: usize) -> [Matrix; 3] {
    let mut rng = StdRng::seed_from_u64(SEED);
    [
        random_matrix(&mut rng, size),
        random_matrix(&mut rng, size),
        random_matrix(&mut rng, size),
    ]
}
