pub mod region;
pub mod session;
