pub mod elevator;
pub mod queue;

#[cfg(test)]
mod elevator_tests;

pub use elevator::Elevator;
pub use elevator::Fleet;
