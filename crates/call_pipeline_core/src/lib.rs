//! Transport-free building blocks for the CSV-to-voice-call pipeline.
//!
//! Nothing in this crate talks to AWS or the telephony provider; it owns the
//! message contract, CSV row parsing, Lambda event decoding, and the shape of
//! outbound call requests.

pub mod contract;
pub mod csv_rows;
pub mod events;
pub mod ncco;
