mod api;
mod app;
mod config;
mod error;
mod extract;
mod logging;
mod output;
mod prompt;

#[cfg(test)]
mod test_support;

use std::io;
use std::process::exit;

use app::App;
use config::Config;
use error::AppError;

fn report(e: &AppError) {
    if let AppError::Status { status, .. } = e {
        tracing::debug!(%status, "server rejected the request");
    }
    println!("{}", e);
    if let Some(line) = e.follow_up() {
        println!("{}", line);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = Config::from_cli();
    if let Err(e) = logging::init_tracing(config.verbose) {
        eprintln!("WARNING: {}", e);
    }

    let app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            report(&e);
            exit(1);
        }
    };

    let mut input = io::stdin().lock();
    let mut output = io::stdout();
    if let Err(e) = app.run(&mut input, &mut output).await {
        report(&e);
        exit(1);
    }
}
