//! Diagnostic creation, severity management, and rendering for Mosaic.
//!
//! This crate provides structured [`Diagnostic`] messages with severity
//! levels and error codes. The thread-safe [`DiagnosticSink`] accumulates
//! diagnostics as the placement pipeline runs, and [`TerminalRenderer`]
//! formats them for terminal output. Placement has no source text, so
//! diagnostics carry notes and help lines rather than source spans.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::TerminalRenderer;
pub use severity::Severity;
pub use sink::DiagnosticSink;
