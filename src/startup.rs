use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::error::InternalError;
use actix_web::web::Data;
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::authorization::Authorizer;
use crate::gmail_client::GmailClient;
use crate::routes;

/// Target of the redirect served on `GET /`.
pub struct SiteUrl(pub String);

pub fn run(
    listener: TcpListener,
    authorizer: Authorizer,
    gmail_client: GmailClient,
    site_url: String,
    allowed_origin: String,
) -> Result<Server, std::io::Error> {
    let authorizer = Data::new(authorizer);
    let gmail_client = Data::new(gmail_client);
    let site_url = Data::new(SiteUrl(site_url));
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/", web::get().to(routes::home))
            .route("/health_check", web::get().to(routes::health_check))
            .service(
                web::resource("/send")
                    // Unparseable bodies count as missing fields.
                    .app_data(web::FormConfig::default().error_handler(|err, _req| {
                        InternalError::from_response(err, HttpResponse::InternalServerError().finish())
                            .into()
                    }))
                    .route(web::post().to(routes::send))
                    .wrap(cors(&allowed_origin)),
            )
            .service(
                web::resource("/sendMail")
                    .route(web::post().to(routes::send_mail))
                    .default_service(web::to(routes::unsupported_method))
                    .wrap(cors(&allowed_origin)),
            )
            .app_data(authorizer.clone())
            .app_data(gmail_client.clone())
            .app_data(site_url.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}

fn cors(allowed_origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(allowed_origin)
        .allowed_methods(vec!["POST"])
        .allow_any_header()
}
