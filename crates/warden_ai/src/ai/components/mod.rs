//! AI components: FSM state, suspicion, blackboard memory

pub mod blackboard;
pub mod fsm;
pub mod suspicion;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod blackboard_tests;
#[cfg(test)]
mod fsm_tests;

pub use blackboard::*;
pub use fsm::*;
pub use suspicion::*;
