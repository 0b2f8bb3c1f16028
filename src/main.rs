use std::{
    io::{self, Read},
    process::ExitCode,
};

use telegram_login::{
    LogConfig, LoginConfig, LoginRequest, LoginService, VerifierMetrics, init_logging,
    redact_credentials,
};
use tracing::{debug, error, info};

const USAGE: &str = "usage: telegram-login [REQUEST_URL]

Verifies a Telegram login and prints the decision as JSON.
With REQUEST_URL, the login data is read from its query string.
Without it, a Login Widget JSON callback body is read from stdin.

environment:
  TELEGRAM_BOT_TOKEN          bot token (required)
  TELEGRAM_AUTH_MAX_AGE       freshness window in seconds (0 or unset disables)
  TELEGRAM_LOGIN_MODE         widget | payload (default widget)
  TELEGRAM_PUBLIC_IDENTIFIER  public identifier (payload mode)
  LOG_FORMAT                  pretty | json
  RUST_LOG                    log filter (default info)";

fn main() -> ExitCode {
    if let Err(e) = init_logging(&LogConfig::from_env()) {
        eprintln!("failed to initialize logging: {e}");
    }

    let arg = std::env::args().nth(1);
    if matches!(arg.as_deref(), Some("-h" | "--help")) {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let config = match LoginConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid login configuration");
            eprintln!("{e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let mut service = match LoginService::from_config(&config) {
        Ok(service) => service,
        Err(e) => {
            error!(error = %e, "Invalid login configuration");
            return ExitCode::from(2);
        }
    };
    match VerifierMetrics::new() {
        Ok(metrics) => service = service.with_metrics(metrics),
        Err(e) => error!(error = %e, "Metrics disabled"),
    }

    info!(mode = %service.mode(), freshness_window = ?config.freshness_window(), "Verifying login");

    let response = match arg {
        Some(url) => {
            debug!(request = %redact_credentials(&url), "Verifying request URL");
            service.handle(LoginRequest::Url(url))
        }
        None => {
            let mut body = String::new();
            match io::stdin().read_to_string(&mut body) {
                Ok(_) => service.handle(LoginRequest::Json(body)),
                Err(e) => {
                    error!(error = %e, "Failed to read login data from stdin");
                    return ExitCode::from(2);
                }
            }
        }
    };

    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!(error = %e, "Failed to serialize response");
            return ExitCode::from(2);
        }
    }

    if let Some(metrics) = service.metrics() {
        if let Ok(rendered) = metrics.render() {
            debug!(metrics = %rendered, "Verification metrics");
        }
    }

    if response.is_success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
