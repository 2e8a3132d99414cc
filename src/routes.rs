use crate::{
    api::{activity_request, attendance, calendar},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
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

    let clock_limiter = Arc::new(build_limiter(config.rate_clock_per_min));
    let submit_limiter = Arc::new(build_limiter(config.rate_submit_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
             // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/attendance")
                    // /attendance/clock-in
                    .service(
                        web::resource("/clock-in")
                            .wrap(clock_limiter.clone())
                            .route(web::post().to(attendance::clock_in)),
                    )
                    // /attendance/clock-out
                    .service(
                        web::resource("/clock-out")
                            .wrap(clock_limiter.clone())
                            .route(web::put().to(attendance::clock_out)),
                    )
                    // /attendance/status
                    .service(
                        web::resource("/status").route(web::get().to(attendance::clock_status)),
                    )
                    // /attendance/me
                    .service(
                        web::resource("/me").route(web::get().to(attendance::my_attendance)),
                    )
                    // /attendance/all
                    .service(
                        web::resource("/all").route(web::get().to(attendance::all_attendance)),
                    ),
            )
            .service(
                web::scope("/requests")
                    // /requests
                    .service(
                        web::resource("")
                            .wrap(submit_limiter.clone())
                            .route(web::post().to(activity_request::submit_request))
                            .route(web::get().to(activity_request::list_requests)),
                    )
                    // /requests/pending-count
                    .service(
                        web::resource("/pending-count")
                            .route(web::get().to(activity_request::pending_count)),
                    )
                    // /requests/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(activity_request::approve_request)),
                    )
                    // /requests/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(activity_request::reject_request)),
                    ),
            )
            // /calendar
            .service(web::resource("/calendar").route(web::get().to(calendar::team_calendar))),
    );
}
