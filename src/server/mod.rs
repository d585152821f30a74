//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
    SessionMiddleware,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};

use crate::domain::ProjectService;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{accounts, generate, projects, publish};
use crate::middleware::Trace;
use crate::outbound::generation::PollinationsSource;
use crate::outbound::persistence::{DieselAccountService, DieselProjectStore};

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::days(7)),
        )
        .build();

    // The public /p route stays outside the session scope.
    let api = web::scope("/api")
        .wrap(session)
        .service(accounts::signup)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::check)
        .service(projects::save)
        .service(projects::list)
        .service(projects::fetch)
        .service(projects::remove)
        .service(projects::deploy)
        .service(projects::undeploy)
        .service(generate::generate);

    App::new()
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(publish::view)
}

fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let store = DieselProjectStore::new(config.db_pool.clone());
    let accounts = DieselAccountService::new(config.db_pool.clone());
    let generation = PollinationsSource::new(
        config.generation_endpoint.clone(),
        config.generation_timeout,
    )
    .map_err(|error| std::io::Error::other(format!("generation client failed: {error}")))?;
    Ok(HttpState::new(
        Arc::new(accounts),
        ProjectService::new(Arc::new(store)),
        Arc::new(generation),
    ))
}

/// Construct an Actix HTTP server from the provided configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when building the upstream client or binding
/// the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config)?);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
