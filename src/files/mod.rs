pub mod repo;
pub mod services;
