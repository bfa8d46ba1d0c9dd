//! nacetree: rebuild the NACE Rev. 2.1 classification hierarchy from its published table.
//!
//! Layers, innermost first: [`domain`] (classification and hierarchy fold),
//! [`application`] (extraction, conversion and export services),
//! [`infrastructure`] (filesystem, HTTP and wiring) and [`cli`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
