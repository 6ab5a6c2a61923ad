pub mod auth;
pub mod gallery;
pub mod service;
pub mod site_setting;
pub mod testimonial;
pub mod user;

pub use auth::*;
pub use user::*;
pub use gallery::*;
pub use service::*;
pub use site_setting::*;
pub use testimonial::*;
