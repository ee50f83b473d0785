pub mod add;
pub mod cli;
pub mod delete;
pub mod edit;
pub mod list;
pub mod search;
pub mod show;
pub mod status;
