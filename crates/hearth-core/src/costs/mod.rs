pub mod buying;
pub mod renting;
