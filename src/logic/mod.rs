pub mod catalog_filter;
pub mod selection;
pub mod validate;

pub use catalog_filter::*;
pub use selection::*;
pub use validate::*;
