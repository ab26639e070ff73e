use crate::{
    api::{department, employee, leave_request, leave_type, report},
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

    let api_limiter = Arc::new(build_limiter(config.rate_api_per_min));
    let transition_limiter = Arc::new(build_limiter(config.rate_transition_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter)
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /leave/duration must be registered before the {id} matcher
                    .service(
                        web::resource("/duration")
                            .route(web::get().to(leave_request::duration_preview)),
                    )
                    // /leave/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave_request::get_leave))
                            .route(web::put().to(leave_request::update_leave))
                            .route(web::delete().to(leave_request::delete_leave)),
                    )
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .wrap(transition_limiter.clone())
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/refuse
                    .service(
                        web::resource("/{id}/refuse")
                            .wrap(transition_limiter.clone())
                            .route(web::put().to(leave_request::refuse_leave)),
                    ),
            )
            .service(
                web::scope("/reports")
                    // /reports/leave
                    .service(
                        web::resource("/leave").route(web::get().to(report::leave_report)),
                    ),
            )
            .service(
                web::scope("/leave-types")
                    // /leave-types
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_type::list_leave_types))
                            .route(web::post().to(leave_type::create_leave_type)),
                    ),
            )
            .service(
                web::scope("/departments")
                    // /departments
                    .service(
                        web::resource("").route(web::get().to(department::list_departments)),
                    ),
            )
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}").route(web::get().to(employee::get_employee)),
                    ),
            ),
    );
}
