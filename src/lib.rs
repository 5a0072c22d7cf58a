pub mod agent;
pub mod aggregate;
pub mod config;
pub mod error;
pub mod history;
pub mod http;
pub mod options;
pub mod query;
pub mod record;
pub mod response;
pub mod server;
pub mod service;
pub mod store;
pub mod suggest;
pub mod tools;
