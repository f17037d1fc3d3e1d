// Library for tests to access modules

pub mod config;
pub mod docker_repo;
pub mod error;
pub mod host_repo;
pub mod metrics;
pub mod models;
pub mod resolver;
pub mod routes;
pub mod version;
pub mod vm_repo;
