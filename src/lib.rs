//! Check-in sessions for children's ministry venues and the guardian notification queue
//! that reports each check-in over an external messaging channel.

pub mod model;
pub mod server;
