use crate::{
    api::{balance, desired_months, leave},
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

    let submit_limiter = Arc::new(build_limiter(config.rate_submit_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(protected_limiter)
            .service(
                web::scope("/leave")
                    // /leave (submission shares the stricter limiter)
                    .service(
                        web::resource("")
                            .wrap(submit_limiter.clone())
                            .route(web::get().to(leave::leave_list))
                            .route(web::post().to(leave::submit_leave)),
                    )
                    // /leave/preview
                    .service(web::resource("/preview").route(web::post().to(leave::preview_dates)))
                    // /leave/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave::get_leave)))
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve").route(web::put().to(leave::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject").route(web::put().to(leave::reject_leave)),
                    ),
            )
            .service(
                web::scope("/balance")
                    .service(web::resource("").route(web::get().to(balance::get_balances)))
                    .service(
                        web::resource("/allocate")
                            .route(web::post().to(balance::allocate_balances)),
                    )
                    .service(
                        web::resource("/topup").route(web::post().to(balance::top_up_balance)),
                    ),
            )
            .service(
                web::scope("/desired-months")
                    .service(
                        web::resource("")
                            .route(web::get().to(desired_months::get_desired_months))
                            .route(web::post().to(desired_months::submit_desired_months)),
                    )
                    .service(
                        web::resource("/validate")
                            .route(web::post().to(desired_months::validate_desired_months)),
                    ),
            ),
    );
}
