pub mod acquire;
pub mod list;
pub mod process;
pub mod serve;
