//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Request carrying ?next=<target>:
//!     → return_to.rs (read the redirect parameter)
//!     → redirect.rs (parse, unsafe paths, `//`, scheme, host)
//!     → target unchanged, or the configured fallback
//! ```
//!
//! # Design Decisions
//! - Fail closed: any failed check yields the fallback
//! - Never errors: hostile input is not an exceptional condition
//! - No trust in client input

pub mod redirect;
pub mod return_to;

pub use redirect::{sanitize, RedirectPolicy, Rejection};
pub use return_to::ReturnTo;
