//! Device implementations

pub mod sim;
