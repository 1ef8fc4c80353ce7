//! Controllers provided by the application.

pub mod home;
pub mod user;

pub use home::HomeController;
pub use user::UserController;
