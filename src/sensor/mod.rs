pub mod feed;
pub mod slot;
pub mod source;

pub use feed::SensorFeed;
pub use slot::ReadingSlot;
pub use source::{ChannelSource, ReplaySource, SourcePoll, TimedReading, WindSource};
