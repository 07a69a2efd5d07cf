use clap::Parser;
use tokengate::cli::{Args, build_config, init_logging, load_jwt_secret, open_database};
use tokengate::run_server;
use tracing::{error, info};

fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    // Removes JWT_SECRET from the environment, so it runs before any runtime thread exists
    let Some(jwt_secret) = load_jwt_secret(args.jwt_secret_file.as_deref()) else {
        std::process::exit(1);
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            error!(error = %e, "Failed to start async runtime");
            std::process::exit(1);
        });

    runtime.block_on(serve(args, jwt_secret));
}

async fn serve(args: Args, jwt_secret: String) {
    let Some(db) = open_database(&args.database).await else {
        std::process::exit(1);
    };

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    let local_addr = listener.local_addr().unwrap_or_else(|e| {
        error!(error = %e, "Failed to read local address");
        std::process::exit(1);
    });

    let config = build_config(
        db,
        jwt_secret,
        args.access_token_ttl,
        args.refresh_token_ttl,
        args.bcrypt_cost,
    );

    info!(
        address = %local_addr,
        access_ttl = config.lifetimes.access_secs,
        refresh_ttl = config.lifetimes.refresh_secs,
        "Listening"
    );

    if let Err(e) = run_server(config, listener).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
