// src/lib.rs

//! feedpress: RSS/Atom feeds in, one Markdown record per new article out.

pub mod config;
pub mod error;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod models;
pub mod pipeline;
pub mod record;
pub mod services;
pub mod storage;
pub mod utils;
