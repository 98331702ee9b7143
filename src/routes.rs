use std::sync::Arc;

use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

use crate::{
    api::{attendance, chat, dashboard, employee, presence},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/verify")
                    .wrap(login_limiter.clone())
                    .route(web::get().to(handlers::verify)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter)
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out").route(web::post().to(attendance::check_out)),
                    )
                    .service(
                        web::resource("/today").route(web::get().to(attendance::today_records)),
                    )
                    .service(
                        web::resource("/records").route(web::get().to(attendance::all_records)),
                    )
                    .service(
                        web::resource("/employees-with-hours")
                            .route(web::get().to(attendance::employees_with_hours)),
                    ),
            )
            .service(
                web::scope("/presence")
                    .service(web::resource("").route(web::get().to(presence::list_presence)))
                    .service(web::resource("/online").route(web::post().to(presence::mark_online)))
                    .service(
                        web::resource("/offline").route(web::post().to(presence::mark_offline)),
                    )
                    .service(
                        web::resource("/heartbeat").route(web::post().to(presence::heartbeat)),
                    ),
            )
            .service(
                web::scope("/chat").service(
                    web::resource("/messages")
                        .route(web::get().to(chat::list_messages))
                        .route(web::post().to(chat::post_message)),
                ),
            )
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees))
                            .route(web::post().to(employee::create_employee)),
                    )
                    .service(
                        web::resource("/search/{query}")
                            .route(web::get().to(employee::search_employees)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/dashboard")
                    .service(web::resource("/stats").route(web::get().to(dashboard::stats)))
                    .service(web::resource("/charts").route(web::get().to(dashboard::charts))),
            ),
    );
}
