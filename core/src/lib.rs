pub mod error;
mod messaging;
mod timestamp;

pub use messaging::*;
pub use timestamp::*;
