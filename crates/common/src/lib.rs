mod error_handling;
mod utils;
mod wrapper;

pub use error_handling::*;
pub use utils::*;
