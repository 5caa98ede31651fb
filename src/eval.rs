pub mod fingerprint;
pub mod job;
pub mod pipeline;
