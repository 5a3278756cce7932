use actix_web::web;

use crate::handlers::{
    dashboard, media, messages, profile, projects, scrolls, settings,
    system::admin_health_check,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(web::resource("/health").route(web::get().to(admin_health_check)))
            .service(web::resource("/dashboard").route(web::get().to(dashboard::admin_dashboard)))
            .service(
                web::scope("/scrolls")
                    .service(
                        web::resource("")
                            .route(web::get().to(scrolls::list_scrolls))
                            .route(web::post().to(scrolls::create_scroll))
                    )
                    .service(
                        web::resource("/{scroll_id}")
                            .route(web::get().to(scrolls::get_scroll))
                            .route(web::put().to(scrolls::replace_scroll))
                            .route(web::delete().to(scrolls::delete_scroll))
                    )
                    .service(
                        web::resource("/{scroll_id}/published")
                            .route(web::patch().to(scrolls::set_scroll_published))
                    )
            )
            .service(
                web::scope("/projects")
                    .service(
                        web::resource("")
                            .route(web::get().to(projects::list_projects))
                            .route(web::post().to(projects::create_project))
                    )
                    .service(
                        web::resource("/{project_id}")
                            .route(web::get().to(projects::get_project))
                            .route(web::put().to(projects::replace_project))
                            .route(web::delete().to(projects::delete_project))
                    )
                    .service(
                        web::resource("/{project_id}/published")
                            .route(web::patch().to(projects::set_project_published))
                    )
            )
            .service(
                web::resource("/profile")
                    .route(web::get().to(profile::get_profile))
                    .route(web::put().to(profile::update_profile))
            )
            .service(
                web::scope("/timeline")
                    .service(
                        web::resource("")
                            .route(web::get().to(profile::list_timeline))
                            .route(web::post().to(profile::create_timeline_event))
                    )
                    .service(web::resource("/reorder").route(web::put().to(profile::reorder_timeline)))
                    .service(
                        web::resource("/{event_id}")
                            .route(web::put().to(profile::update_timeline_event))
                            .route(web::delete().to(profile::delete_timeline_event))
                    )
            )
            .service(
                web::scope("/media")
                    .service(
                        web::resource("")
                            .route(web::get().to(media::list_media))
                            .route(web::post().to(media::upload_media))
                    )
                    .service(
                        web::resource("/{name}")
                            .route(web::get().to(media::media_url))
                            .route(web::delete().to(media::delete_media))
                    )
            )
            .service(
                web::scope("/messages")
                    .service(web::resource("").route(web::get().to(messages::list_messages)))
                    .service(
                        web::resource("/{message_id}")
                            .route(web::get().to(messages::get_message))
                            .route(web::delete().to(messages::delete_message))
                    )
                    .service(
                        web::resource("/{message_id}/reply")
                            .route(web::post().to(messages::reply_to_message))
                    )
            )
            .service(
                web::scope("/settings")
                    .service(web::resource("/account").route(web::get().to(settings::account)))
                    .service(web::resource("/password").route(web::put().to(settings::update_password)))
            )
    );
}
