pub mod builder;
pub mod descriptor;
