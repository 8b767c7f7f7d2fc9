pub mod breadcrumbs;
pub mod routes;
pub mod uploads;

pub use breadcrumbs::{Breadcrumb, Breadcrumbs};
pub use routes::create_routes;
