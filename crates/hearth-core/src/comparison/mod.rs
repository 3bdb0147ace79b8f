pub mod break_even;
pub mod engine;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;
