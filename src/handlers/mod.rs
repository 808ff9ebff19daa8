pub mod appointment;
pub mod category;
pub mod product;
