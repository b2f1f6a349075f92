//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use courier::prelude::*;
//! ```

pub use crate::{
    Body, Client, ClientConfig, ContentType, Custom, Error, Header, Interceptor, Method, Request,
    Response, Result, StatusCode, TlsPolicy, Transport, from_json, header, to_json,
};
pub use serde::{Deserialize, Serialize};
