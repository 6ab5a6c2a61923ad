pub mod auth;
pub mod catalog;
pub mod gallery;
pub mod site_setting;
pub mod testimonial;
pub mod user;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use gallery::GalleryService;
pub use site_setting::SiteSettingService;
pub use testimonial::TestimonialService;
pub use user::UserService;
