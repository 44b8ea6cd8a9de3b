pub mod query;
pub mod system;
