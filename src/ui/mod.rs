pub mod help;
pub mod panels;
pub mod table;
