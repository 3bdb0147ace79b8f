pub mod brackets;
pub mod purchase;
