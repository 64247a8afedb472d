pub mod catalog;
pub mod common;
pub mod farm;
pub mod product;
pub mod selection;

pub use catalog::*;
pub use common::*;
pub use farm::*;
pub use product::*;
pub use selection::*;
