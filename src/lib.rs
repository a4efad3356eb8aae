#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod candidates;
mod consistency;
mod dictionary;
mod mapping;
mod progress;
mod solution;
mod solver;

pub use self::candidates::*;
pub use self::consistency::*;
pub use self::dictionary::*;
pub use self::mapping::*;
pub use self::progress::*;
pub use self::solution::*;
pub use self::solver::*;
