//! Radio schedule service.
//!
//! Schedule rows live in PostgreSQL; reads go through a snapshot cache that
//! partitions every entry into `previous`, `now` and `upnext` relative to the
//! instant it was computed.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
