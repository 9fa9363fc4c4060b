//! Company module: three-layer architecture (domain, repository, service).
//!
//! The repository is the persistence accessor; `CompanyService` validates
//! requests and translates them into repository calls.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::CompanyService;
