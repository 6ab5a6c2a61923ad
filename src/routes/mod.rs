pub mod admin;
pub mod auth;
pub mod cache;
pub mod catalog;
pub mod content;
pub mod gallery;
pub mod testimonials;

use actix_web::web;

use crate::middleware::AdminMiddleware;

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auths").configure(auth::create_routes))
        .service(web::scope("/content").configure(content::create_routes))
        .service(
            web::scope("/admin")
                .wrap(AdminMiddleware)
                .configure(admin::create_routes),
        );
}
