pub mod close;
pub mod consts;
pub mod limits;
pub mod mask;
mod payload;

pub use payload::*;
