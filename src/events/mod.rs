pub mod event;
pub mod sink;

pub use event::Event;
pub use sink::ChannelSink;
pub use sink::EventSink;
pub use sink::LogSink;
