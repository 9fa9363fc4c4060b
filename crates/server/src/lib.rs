pub mod errors;
pub mod grpc;
pub mod metrics;
pub mod routes;
pub mod startup;

pub use startup::run;
