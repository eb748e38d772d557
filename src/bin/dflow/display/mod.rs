mod error;

pub use error::print_error;
