//! HTTP handlers and route configuration.

mod convert;
mod health;
mod index;
mod params;
mod search;
mod tags;
mod users;

#[cfg(test)]
mod tests;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/index", web::get().to(index::index))
            // Listings
            .route("/search", web::get().to(search::search))
            .route("/search_tags", web::get().to(tags::search_tags))
            // Profiles
            .service(
                web::scope("/users/{username}")
                    .route("/home", web::get().to(users::home))
                    .route("/posts/{slug}", web::get().to(users::post_detail)),
            ),
    );
}
