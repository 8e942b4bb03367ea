//! Serves a greeting at `/` and the files of `./public` under `/static`.
//!
//! Expects `localhost.crt` and `localhost.key` in the working directory, e.g. from
//! `openssl req -x509 -newkey rsa:2048 -nodes -keyout localhost.key -out localhost.crt -subj /CN=localhost`.

use micro_gemini::protocol::StatusCode;
use micro_gemini::router::Router;
use micro_gemini::server::Server;
use micro_gemini_web::{file_server, strip_prefix};
use std::time::Duration;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let router = Router::builder()
        .handle("/static", strip_prefix("/static", file_server("./public")))
        .handle_fn("/", |response, _request| {
            Box::pin(async move {
                response.set_status(StatusCode::SUCCESS, "text/gemini");
                response.write(b"# Test Response").await?;
                Ok(())
            })
        })
        .build();

    let server = match Server::builder()
        .address("0.0.0.0:1965")
        .certificate("localhost.crt", "localhost.key")
        .handler(router)
        .request_timeout(Duration::from_secs(10))
        .build()
    {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "invalid server settings");
            return;
        }
    };

    if let Err(e) = server.start().await {
        error!(cause = %e, "server stopped");
    }
}
