pub mod dates;
pub mod error;
pub mod logging;
pub mod output;

pub use output::{OutputStyle, print_success, print_warning};
