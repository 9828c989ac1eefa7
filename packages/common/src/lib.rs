pub mod diagnostics;
pub mod error;
pub mod filesystem;
pub mod result;

pub use diagnostics::*;
pub use error::*;
pub use filesystem::*;
pub use result::*;
