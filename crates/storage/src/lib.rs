pub mod dto;
pub mod error;
pub mod keys;
pub mod models;
pub mod repository;
pub mod store;
