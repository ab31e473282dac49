//! Hash partitioning strategy implementations.

mod relay;
mod sequential;
mod sharded;
mod striped;

pub use relay::ChannelRelayHasher;
pub use sequential::SequentialHasher;
pub use sharded::ShardedRelayHasher;
pub use striped::LockStripedHasher;
