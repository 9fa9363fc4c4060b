//! Protobuf contract for the company service.
//!
//! Generated message types, the tonic server trait and the client live in
//! [`company`]; the encoded descriptor set feeds gRPC reflection.

pub mod company {
    tonic::include_proto!("company.v1");
}

/// Encoded `FileDescriptorSet` for `company.v1`.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("company_descriptor");

pub use company::*;
