pub mod app;
pub mod commands;
pub mod config;
pub mod http_server;
pub mod lambda;
pub mod respond;
pub mod search;
pub mod signature;
pub mod slack;
