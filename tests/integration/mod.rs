//! Integration tests against an in-process fake list server
//!
//! These tests drive the real HTTP client, the lifecycle controller and the
//! response file pipeline end to end over loopback.

pub mod batch_update;
pub mod directory_client;
pub mod response_files;
