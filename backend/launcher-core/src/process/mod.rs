//! Spawning and tearing down the bundled server process.

pub mod spawn;
pub mod terminate;
