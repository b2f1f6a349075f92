//! Prelude module for convenient imports.
//!
//! ```ignore
//! use courier_core::prelude::*;
//! ```

pub use crate::{
    Body, ContentType, Custom, Error, Header, Interceptor, InterceptorChain, Method, Request,
    RequestBuilder, Response, Result, Transport, from_json, header, to_json,
};
