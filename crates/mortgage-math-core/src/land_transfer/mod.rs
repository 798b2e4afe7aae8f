pub mod brackets;
pub mod tax;
