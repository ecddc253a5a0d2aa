//! Storage abstractions shared by the roster service and its backends.
//!
//! This crate provides:
//!
//! - **Store backend abstraction** ([`backend`]) - Traits implemented by the MongoDB and in-memory backends
//! - **Query and filtering API** ([`query`]) - Backend-neutral filter expressions and a visitor for translating them
//! - **Collections interface** ([`collection`]) - Handles scoped to a single collection
//! - **Document store** ([`store`]) - Owner of the runtime-selected backend
//! - **Error handling** ([`error`]) - Store error and result types
//!
//! Documents are plain [`bson::Document`]s; each one carries its store-assigned
//! [`bson::oid::ObjectId`] under [`query::ID_FIELD`].

#[allow(unused_extern_crates)]
extern crate self as roster_core;

pub mod backend;
pub mod collection;
pub mod error;
pub mod query;
pub mod store;
