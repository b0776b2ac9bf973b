pub mod generate;
pub mod seal;
