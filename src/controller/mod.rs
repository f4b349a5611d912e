//! # Controller
//!
//! Core modules of the secrets mount provider.
//!
//! - `backoff`: Retry classification and exponential backoff
//! - `parser`: Secret object parsing and validation
//! - `rate_limit`: Per-backend token-bucket rate limiting
//! - `reconciler`: Fetch engine, JMES path extraction and mount orchestration

pub mod backoff;
pub mod parser;
pub mod rate_limit;
pub mod reconciler;
