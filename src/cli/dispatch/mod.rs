use crate::cli::actions::{server::Args, Action};
use anyhow::{Context, Result};

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let backend_url = matches
        .get_one::<String>("backend-url")
        .cloned()
        .context("missing required argument: --backend-url")?;
    let identity_timeout = matches
        .get_one::<u64>("identity-timeout")
        .copied()
        .unwrap_or(5);
    let secure_cookies = matches.get_flag("secure-cookies");

    Ok(Action::Server(Args {
        port,
        backend_url,
        identity_timeout,
        secure_cookies,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn test_handler_builds_server_action() {
        let matches = commands::new().get_matches_from(vec![
            "neotech-web",
            "--backend-url",
            "http://localhost:8000",
            "--identity-timeout",
            "7",
        ]);

        let action = handler(&matches).expect("action");
        let Action::Server(args) = action;
        assert_eq!(args.port, 8080);
        assert_eq!(args.backend_url, "http://localhost:8000");
        assert_eq!(args.identity_timeout, 7);
        assert!(!args.secure_cookies);
    }
}
