pub mod appointment;
pub mod base;
pub mod product;
pub mod taxonomy;

pub use appointment::AppointmentService;
pub use base::{BaseService, CrudService};
pub use product::ProductService;
pub use taxonomy::TaxonomyService;
