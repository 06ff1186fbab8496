pub mod app;
pub mod cache;
pub mod clinical;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod links;
pub mod output;
pub mod pathology;
pub mod repository;
pub mod resolve;
pub mod tissue;
