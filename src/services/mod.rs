pub mod matrix;
pub mod recommendations;
pub mod spendings;
