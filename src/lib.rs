pub mod advisor;
pub mod cli;
pub mod config;
pub mod data;
pub mod export;
pub mod planning;
pub mod scoring;
pub mod server;
pub mod storage;
