mod table;

pub use crate::datasets::table::*;
