use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};

use tracing_actix_web::TracingLogger;

use crate::client::{EmailClient, WhatsAppClient};
use crate::controller::{
    campaigns, communications, donations, donors, org_settings, reports, send_email,
};
use crate::dispatch::SendDelay;
use crate::error::RestError;
use crate::repo::Repositories;

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("I am alive")
}

/// Malformed bodies, queries and paths answer with the same JSON error shape as handlers
fn bad_request(err: impl std::fmt::Display) -> actix_web::Error {
    RestError::ParseError(err.to_string()).into()
}

/// Run the application on a specified TCP listener
pub fn run(
    listener: TcpListener,
    repos: Repositories,
    email_client: EmailClient,
    whatsapp_client: WhatsAppClient,
    send_delay: SendDelay,
) -> anyhow::Result<Server> {
    let repos = web::Data::new(repos);
    let email_client = web::Data::new(email_client);
    let whatsapp_client = web::Data::new(whatsapp_client);
    let send_delay = web::Data::new(send_delay);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(|err, _| bad_request(err)))
            .app_data(web::QueryConfig::default().error_handler(|err, _| bad_request(err)))
            .app_data(web::PathConfig::default().error_handler(|err, _| bad_request(err)))
            .app_data(repos.clone())
            .app_data(email_client.clone())
            .app_data(whatsapp_client.clone())
            .app_data(send_delay.clone())
            .service(health_check)
            .service(
                web::scope("/api")
                    .service(send_email::send_email)
                    .service(donors::scope())
                    .service(campaigns::scope())
                    .service(donations::scope())
                    .service(reports::scope())
                    .service(org_settings::scope())
                    .service(communications::scope()),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}

