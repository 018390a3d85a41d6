pub mod checkpoint;
pub mod historical;
pub mod report;
pub mod retry;
