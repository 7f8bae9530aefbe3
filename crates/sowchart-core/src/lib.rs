//! Sowchart Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Sowchart viewer.
//! It includes:
//!
//! - **Corpus**: The immutable table of product flowcharts ([`corpus::Corpus`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Theme**: The fixed visual theme handed to diagram engines ([`theme::Theme`])
//! - **Filenames**: Deterministic export naming ([`filename`] module)

pub mod color;
pub mod corpus;
pub mod filename;
pub mod theme;
