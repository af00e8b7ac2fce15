// Library for tests to access modules

pub mod backend;
pub mod config;
pub mod connector;
pub mod error;
pub mod history_repo;
pub mod models;
pub mod prune_worker;
pub mod routes;
pub mod version;
