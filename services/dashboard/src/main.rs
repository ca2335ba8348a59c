use actix_web::{guard, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql::Schema;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use dashboard_service::context::AppContext;
use dashboard_service::schema::auth::CallerSession;
use dashboard_service::schema::{create_schema_with_context, AppSchema};
use service_core::telemetry::logging::{init_subscriber, make_subscriber};
use tracing_actix_web::TracingLogger;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_subscriber(make_subscriber("dashboard_service", "info"));

    let ctx = AppContext::from_env().await?;
    let bind_address = ctx.bind_address.clone();
    let schema = create_schema_with_context(ctx.clone());

    tracing::info!("Listening on {}.", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(schema.clone()))
            .app_data(web::Data::from(ctx.clone()))
            .wrap(TracingLogger::default())
            .configure(configure_service)
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}

pub fn configure_service(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::post().to(index))
            .route(
                web::get()
                    .guard(guard::Header("upgrade", "websocket"))
                    .to(index_ws),
            )
            .route(web::get().to(index_playground)),
    );
}

async fn index(
    schema: web::Data<AppSchema>,
    app: web::Data<AppContext>,
    http_req: HttpRequest,
    req: GraphQLRequest,
) -> GraphQLResponse {
    // A bad Authorization header demotes the request to anonymous instead of
    // failing it; operations that need a caller reject it downstream.
    let session = CallerSession::try_from_req(&http_req, app.access_token_secret.as_str())
        .unwrap_or_else(|err| {
            log::warn!("Ignoring Authorization header: {:?}", err);
            None
        });

    schema.execute(req.into_inner().data(session)).await.into()
}

async fn index_ws(
    schema: web::Data<AppSchema>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse> {
    use async_graphql_actix_web::GraphQLSubscription;

    let ws_subscription = GraphQLSubscription::new(Schema::clone(&*schema));
    ws_subscription.start(&req, payload)
}

async fn index_playground() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(playground_source(
            GraphQLPlaygroundConfig::new("/").subscription_endpoint("/"),
        ))
}
