//! # Kinematics Module
//!
//! Per-identity movement state built from tracker output.
//!
//! - `position_log` - ordered center history for one identity
//! - `accumulator` - distance and acceleration-sample accumulation

pub mod accumulator;
pub mod position_log;

pub use accumulator::{KinematicsAccumulator, MotionState};
pub use position_log::PositionLog;
