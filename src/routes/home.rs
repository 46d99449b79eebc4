use actix_web::http::header::LOCATION;
use actix_web::{web, HttpResponse};

use crate::startup::SiteUrl;

/// The relay has no pages of its own; send visitors to the site it serves.
pub async fn home(site_url: web::Data<SiteUrl>) -> HttpResponse {
    HttpResponse::MovedPermanently()
        .insert_header((LOCATION, site_url.0.as_str()))
        .finish()
}
