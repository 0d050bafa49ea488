pub mod keys;
pub mod repository;
pub mod sqlite;
