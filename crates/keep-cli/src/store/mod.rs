//! Blob-store backends for the CLI.

pub mod dir;
pub mod s3;

pub use dir::DirStore;
pub use s3::S3Store;
