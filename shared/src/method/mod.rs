pub mod catalog;
pub mod error;
pub mod identifier;
pub mod method_index;
