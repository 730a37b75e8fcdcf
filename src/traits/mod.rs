//! Core trait abstractions for the variant-extraction library.
//!
//! These traits define the interfaces applications implement to provide the
//! rendering session, product navigation, and result hand-off. The engine
//! only ever talks to these seams, so tests substitute fakes for all three.

pub mod navigator;
pub mod session;
pub mod sink;

pub use navigator::Navigator;
pub use session::ContentSession;
pub use sink::RecordSink;
