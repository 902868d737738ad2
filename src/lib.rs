pub mod quiz;
pub mod terminal;
