//! Receipt-parsing response decoding
//!
//! The receipt endpoint answers with `{"description": "..."}` on success or
//! `{"error": "..."}` on failure. The description is model output: JSON,
//! usually wrapped in a markdown code fence. This module strips the fence,
//! parses the payload and turns it into an expense draft. Every failure is a
//! single `JayloyError::Receipt`; the HTTP call itself lives outside the crate.

mod parsed;
mod response;

pub use parsed::{ParsedReceipt, ReceiptItem};
pub use response::{decode_batch, decode_response, strip_code_fences, EndpointResponse};
