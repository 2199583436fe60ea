//! app.rs
use crate::handlers::{
    campaign_handler, email_handler, report_handler, template_handler, tracking_handler,
    user_handler,
};
use actix_web::web;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/phishing")
                    .route("/open", web::get().to(tracking_handler::track_open_endpoint))
                    .route(
                        "/click",
                        web::get().to(tracking_handler::track_click_endpoint),
                    )
                    .route(
                        "/status/{email_id}",
                        web::get().to(tracking_handler::delivery_status_endpoint),
                    )
                    .route(
                        "/attempts",
                        web::post().to(user_handler::log_attempt_endpoint),
                    )
                    .route(
                        "/attempts/{campaign_id}",
                        web::get().to(user_handler::list_attempts_endpoint),
                    ),
            )
            .service(
                web::scope("/campaigns")
                    .route(
                        "",
                        web::post().to(campaign_handler::create_campaign_endpoint),
                    )
                    .route(
                        "",
                        web::get().to(campaign_handler::list_campaigns_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::get().to(campaign_handler::get_campaign_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::put().to(campaign_handler::update_campaign_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::delete().to(campaign_handler::delete_campaign_endpoint),
                    )
                    .route(
                        "/{id}/send",
                        web::post().to(email_handler::send_campaign_endpoint),
                    ),
            )
            .service(
                web::scope("/templates")
                    .route(
                        "",
                        web::get().to(template_handler::list_templates_endpoint),
                    )
                    .route(
                        "",
                        web::post().to(template_handler::create_template_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::get().to(template_handler::get_template_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::put().to(template_handler::update_template_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::delete().to(template_handler::delete_template_endpoint),
                    ),
            )
            .service(
                web::scope("/users")
                    .route("", web::get().to(user_handler::list_users_endpoint))
                    .route("", web::post().to(user_handler::create_user_endpoint))
                    .route("/{id}", web::get().to(user_handler::get_user_endpoint))
                    .route("/{id}", web::put().to(user_handler::update_user_endpoint))
                    .route(
                        "/{id}",
                        web::delete().to(user_handler::delete_user_endpoint),
                    ),
            )
            .service(
                web::scope("/email")
                    .route("/send", web::post().to(email_handler::send_email_endpoint)),
            )
            .service(
                web::scope("/reporting/campaign/{id}")
                    .route(
                        "/report",
                        web::get().to(report_handler::campaign_report_endpoint),
                    )
                    .route(
                        "/report/pdf",
                        web::get().to(report_handler::campaign_report_pdf_endpoint),
                    )
                    .route(
                        "/report/excel",
                        web::get().to(report_handler::campaign_report_excel_endpoint),
                    ),
            ),
    );
}
