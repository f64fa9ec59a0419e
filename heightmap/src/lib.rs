// heightmap holds the diamond–square generator and the grid it produces
pub mod config;
pub mod diamond_square;
pub mod error;
pub mod grid;
pub mod rng;

pub use config::{ConfigError, GeneratorConfig, MAX_EXPONENT};
pub use diamond_square::{DiamondSquare, diamond_pass, generate, square_pass};
pub use error::{Error, InvalidArgument, Result};
pub use grid::Grid;
pub use rng::{RandomSource, ScriptedSource, SeededSource};
