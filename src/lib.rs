pub mod analyzer;
pub mod api;
pub mod config;
pub mod data_models;
pub mod export;
pub mod keyword_engine;
pub mod recommendations;
pub mod scorer;
pub mod search;
