#![forbid(unsafe_code)]

//! Headless presentation layer for `swipe-core`.
//!
//! # Role
//! Stands in for the DOM in tests: answers measurement queries, owns the
//! window listener table, plays return transitions by ticking them, delivers
//! the "transition finished" and "removed" notifications, and records every
//! frame the component publishes.
//!
//! # JSONL Schema
//!
//! ```json
//! {"event":"frame","t_ms":0,"offset":42.0,"opacity":0.99,"dragging":true,"resetting":false}
//! {"event":"reset_started","t_ms":16,"from":42.0,"duration_ms":300}
//! {"event":"settled","t_ms":316}
//! {"event":"removal_requested","t_ms":16,"exit_offset":200.0,"mode":"animated"}
//! {"event":"removed","t_ms":266}
//! ```

pub mod driver;
pub mod host;

pub use driver::Driver;
pub use host::HeadlessHost;
