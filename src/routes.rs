use crate::{
    api::{department, employee, gate_pass, notice, outside_work, overview, session, settings, verification},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

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

    // Kiosk scan endpoints are the abuse surface; admin reads get more room.
    let verify_limiter = Arc::new(build_limiter(config.rate_verify_per_min));
    let admin_limiter = Arc::new(build_limiter(config.rate_admin_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("/verify")
                            .wrap(verify_limiter.clone())
                            .route(web::post().to(verification::verify)),
                    )
                    .service(
                        web::resource("/visitor")
                            .wrap(verify_limiter.clone())
                            .route(web::post().to(verification::visitor)),
                    )
                    .service(
                        web::resource("/sessions")
                            .wrap(admin_limiter.clone())
                            .route(web::get().to(session::get_sessions)),
                    )
                    .service(
                        web::resource("/logs")
                            .wrap(admin_limiter.clone())
                            .route(web::get().to(session::get_logs))
                            .route(web::delete().to(session::purge_logs)),
                    )
                    .service(
                        web::resource("/logs/import")
                            .wrap(admin_limiter.clone())
                            .route(web::post().to(session::import_logs)),
                    )
                    .service(
                        web::resource("/logs/visitors")
                            .wrap(admin_limiter.clone())
                            .route(web::get().to(session::get_visitor_logs)),
                    )
                    .service(
                        web::resource("/active-visitors")
                            .wrap(admin_limiter.clone())
                            .route(web::get().to(session::active_visitors)),
                    ),
            )
            .service(
                web::resource("/gate-pass")
                    .wrap(verify_limiter.clone())
                    .route(web::post().to(gate_pass::process_gate_pass))
                    .route(web::get().to(gate_pass::list_gate_passes)),
            )
            .service(
                web::resource("/overview")
                    .wrap(admin_limiter.clone())
                    .route(web::get().to(overview::get_overview)),
            )
            .service(
                web::resource("/live/latest")
                    .route(web::get().to(verification::live_latest)),
            )
            .service(
                web::scope("/outside-work")
                    .wrap(admin_limiter.clone())
                    .service(web::resource("/assign").route(web::post().to(outside_work::assign)))
                    .service(
                        web::resource("/recall/{employee_id}")
                            .route(web::post().to(outside_work::recall)),
                    )
                    .service(
                        web::resource("/extend/{employee_id}")
                            .route(web::post().to(outside_work::extend)),
                    ),
            )
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/departments")
                    .service(
                        web::resource("")
                            .route(web::get().to(department::list_departments))
                            .route(web::post().to(department::create_department)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(department::update_department))
                            .route(web::delete().to(department::delete_department)),
                    ),
            )
            .service(
                web::scope("/notices")
                    .service(
                        web::resource("")
                            .route(web::get().to(notice::list_notices))
                            .route(web::post().to(notice::create_notice)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(notice::update_notice))
                            .route(web::delete().to(notice::delete_notice)),
                    ),
            )
            .service(
                web::resource("/settings")
                    .route(web::get().to(settings::get_settings))
                    .route(web::put().to(settings::update_settings)),
            ),
    );
}
