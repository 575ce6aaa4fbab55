pub mod catalog;
pub mod project;
pub mod query;
pub mod result;
pub mod validation;
