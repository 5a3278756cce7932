use actix_web::web;

use crate::handlers::{
    home::{health, home},
    notifications::send_email,
    projects::debug_projects,
};

mod admin;
mod auth;
mod json_error;
mod public;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health);

    cfg.service(
        web::scope("/api")
            .configure(public::config_routes)
            .configure(auth::config_routes)
            .configure(admin::config_routes)
            .service(web::resource("/send-email").route(web::post().to(send_email)))
            .service(web::resource("/debug-projects").route(web::get().to(debug_projects)))
    );

    cfg.configure(json_error::config_routes);
}
