mod alert;
mod preset;

pub use alert::*;
pub use preset::*;
