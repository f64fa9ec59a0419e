use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // Raised before any grid is allocated
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
}

// Why a generator argument was rejected
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidArgument {
    #[error("size must be at least 1")]
    ZeroSize,
    #[error("size must be odd, got {0}")]
    EvenSize(usize),
    #[error("size must be 2^k + 1, got {0}")]
    NotDyadic(usize),
    #[error("size {0} is too large, size² cells overflow")]
    TooLarge(usize),
    #[error("grid exponent must be in 1..={max}, got {exp}")]
    Exponent { exp: u32, max: u32 },
    #[error("roughness must be finite and within [0, 1e300], got {0}")]
    Roughness(f64),
}

impl Error {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}
