use appconfig_flags::{
    server::{self, AppState},
    ClientConfig, FlagRepository, ServerConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::new().default_filter_or("appconfig=info"))
        .init();

    let config = ClientConfig::from_env();
    let server_config = ServerConfig::from_env();

    let state = AppState {
        flags: FlagRepository::new(config.to_client()?),
    };
    let app = server::router(state, server::cors_layer(&server_config.allow_origin)?);

    let listener = tokio::net::TcpListener::bind(&server_config.bind_addr).await?;
    log::info!(target: "appconfig",
               bind_addr = server_config.bind_addr.as_str(),
               offline = config.is_offline(),
               profile_id = config.default_profile_id();
               "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
