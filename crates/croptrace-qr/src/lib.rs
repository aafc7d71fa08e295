//! QR rendering of serialized croptrace payloads.
//!
//! This crate provides:
//! - A renderer that turns an encoded payload into a PNG data URL, with
//!   caller-controlled module and background colors
//! - The capacity gate for the adopted QR tier (version 40, level M)
//! - Issue facades, single and bulk, that run encode and render in one call
//!
//! The hard correctness constraint: the module bytes embedded in the QR are
//! exactly the serialized payload string. Nothing is truncated, re-encoded,
//! or compressed; payloads over capacity fail instead.
//!
#![deny(missing_docs)]

/// Issue facades combining codec and renderer.
pub mod issue;
/// QR rendering to PNG data URLs.
pub mod render;

pub use issue::{issue_batch, issue_batches, issue_certificate, issue_event, IssueError, IssuedCode};
pub use render::{QrMetadata, QrRenderer, RenderError, RenderOptions, RenderedQr, MAX_PAYLOAD_BYTES};
