//! Processor module for the import.
//!
//! Transforms source records into index actions.

mod record_processor;

pub use record_processor::RecordProcessor;
