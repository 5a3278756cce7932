use actix_web::web;

use crate::handlers::auth;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(web::resource("/login").route(web::post().to(auth::login)))
            .service(web::resource("/refresh-token").route(web::post().to(auth::refresh_token)))
            .service(web::resource("/session").route(web::get().to(auth::session)))
            .service(web::resource("/logout").route(web::post().to(auth::logout)))
            .service(
                web::resource("/password-reset")
                    .route(web::post().to(auth::request_password_reset))
            )
            .service(
                web::resource("/password-reset/confirm")
                    .route(web::post().to(auth::confirm_password_reset))
            )
    );
}
