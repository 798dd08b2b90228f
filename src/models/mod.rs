// Data models for landmarks, angle series and correction reports

pub mod angles;
pub mod keypoint;
pub mod report;

pub use angles::*;
pub use keypoint::*;
pub use report::*;
