pub mod clock;
pub mod filter;
pub mod forms;
pub mod submission;
pub mod summary;
pub mod window;
