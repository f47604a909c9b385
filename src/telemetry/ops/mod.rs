pub mod fetch;
pub mod find;
pub mod serve;
