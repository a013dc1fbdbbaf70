pub mod catalog;
pub mod planning;
