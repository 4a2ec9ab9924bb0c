use clap::Parser;
use bistro::cli::{
    Args, build_config, build_cookie_policy, init_logging, load_jwt_secret, open_database,
    validate_allowed_origin,
};
use bistro::{init_cleanup, run_server, shutdown_signal};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real environment variables still apply
    let dotenv_result = dotenvy::dotenv();

    let args = Args::parse();

    init_logging(&args.log_format);

    if let Err(e) = dotenv_result
        && !e.not_found()
    {
        warn!(error = %e, "Failed to load .env file");
    }

    let Some(jwt_secret) = load_jwt_secret(args.jwt_secret_file.as_deref()) else {
        std::process::exit(1);
    };

    let Some(allowed_origin) = validate_allowed_origin(&args.allowed_origin) else {
        std::process::exit(1);
    };

    let Some(cookies) = build_cookie_policy(args.secure_cookies, args.same_site) else {
        std::process::exit(1);
    };

    if !cookies.secure {
        warn!("Session cookies are sent without the Secure flag");
    }

    let Some(db) = open_database(&args.database).await else {
        std::process::exit(1);
    };

    let cleanup_handle = init_cleanup(&db).await;

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    match listener.local_addr() {
        Ok(local_addr) => info!(address = %local_addr, base = %args.base, "Listening"),
        Err(_) => info!(address = %addr, base = %args.base, "Listening"),
    }

    let config = build_config(
        args.base,
        db.clone(),
        jwt_secret,
        args.token_ttl_secs,
        cookies,
        allowed_origin,
    );

    if let Err(e) = run_server(config, listener, shutdown_signal()).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }

    cleanup_handle.abort();
    db.close().await;
    info!("Server shut down");
}
