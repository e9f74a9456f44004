pub mod categories;
pub mod fetch;
pub mod projects;
