pub mod compare;
pub mod fees;
pub mod mortgage;
pub mod region;
pub mod savings;
pub mod scenarios;
