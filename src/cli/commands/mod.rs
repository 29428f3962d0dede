pub mod config;
pub mod download;
pub mod games;
pub mod search;
