pub mod local;
pub mod persistence;
pub mod remote;
