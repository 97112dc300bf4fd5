//! Storefront HTTP server: configuration, logging bootstrap and the router
//! with the authorization gate installed.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod logging;
pub mod pages;
pub mod server;

pub use config::AppConfig;
