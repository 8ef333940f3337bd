//! DDL object model

mod elements;

pub use elements::*;
