pub mod identifier;
pub mod projection;
pub mod repository;
pub mod status;
pub mod types;
