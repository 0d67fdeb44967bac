//! Port implementations: live (network, disk, system clock), recording,
//! and replaying.

pub mod live;
pub mod recording;
pub mod replaying;
