use actix_web::web;

use crate::handlers::{messages, profile, projects, scrolls};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/public")
            .service(web::resource("/scrolls").route(web::get().to(scrolls::public_scrolls)))
            .service(web::resource("/scrolls/{slug}").route(web::get().to(scrolls::public_scroll)))
            .service(web::resource("/projects").route(web::get().to(projects::public_projects)))
            .service(web::resource("/projects/{slug}").route(web::get().to(projects::public_project)))
            .service(web::resource("/profile").route(web::get().to(profile::public_profile)))
            .service(
                web::scope("/messages")
                    .service(web::resource("/contact").route(web::post().to(messages::submit_contact)))
                    .service(web::resource("/appointment").route(web::post().to(messages::submit_appointment)))
                    .service(web::resource("/demo").route(web::post().to(messages::submit_demo)))
            )
    );
}
