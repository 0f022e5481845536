mod core;
mod records;

pub use self::core::*;
pub use records::*;
