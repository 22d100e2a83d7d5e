//! Semcanvas Core Types and Definitions
//!
//! This crate provides the foundational types shared by the semcanvas diagram
//! controller. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types and the intersection/projection
//!   algorithms used by edge routing ([`geometry`] module)
//! - **Model**: Visual nodes, edges, groups and cardinalities ([`model`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod model;
