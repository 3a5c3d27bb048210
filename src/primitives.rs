//! Ring arithmetic and the pseudo-random generators built on top of it.

pub mod igf;
pub mod mgf;
pub mod poly;
pub mod product_form;
pub mod ternary;
