#![doc = include_str!("../README.md")]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod log;
pub mod selectors;
pub mod tools;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use error::*;
pub use types::*;
