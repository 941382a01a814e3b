//! Browser adapters for the lexi-core ports.
//!
//! Everything here touches `web-sys`/`js-sys` or the WebExtension APIs;
//! the core crate stays platform-free and talks to these through traits.

pub mod http;
pub mod messaging;
pub mod overlay;
pub mod storage;
pub mod timer;
pub mod webext;
