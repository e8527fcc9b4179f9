pub mod config;
pub mod dedup;
pub mod error;
pub mod models;
pub mod output;
pub mod pacer;
pub mod robots;
pub mod scraping;
pub mod session;
