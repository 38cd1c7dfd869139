pub mod models;
pub mod payload;
