use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    Command::new("neotech-web")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("NEOTECH_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("backend-url")
                .short('b')
                .long("backend-url")
                .help("Base URL of the neoTech REST backend, example: https://api.neotech.example")
                .env("NEOTECH_BACKEND_URL")
                .required(true),
        )
        .arg(
            Arg::new("identity-timeout")
                .long("identity-timeout")
                .help("Seconds to wait for the current-user endpoint before treating the session as anonymous")
                .default_value("5")
                .env("NEOTECH_IDENTITY_TIMEOUT")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("secure-cookies")
                .long("secure-cookies")
                .help("Mark session cookies Secure (use when serving behind HTTPS)")
                .env("NEOTECH_SECURE_COOKIES")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("NEOTECH_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "neotech-web");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some(env!("CARGO_PKG_DESCRIPTION").to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_check_port_and_backend_url() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "neotech-web",
            "--port",
            "8080",
            "--backend-url",
            "https://api.neotech.example",
            "--identity-timeout",
            "10",
            "--secure-cookies",
        ]);

        assert_eq!(matches.get_one::<u16>("port").copied(), Some(8080));
        assert_eq!(
            matches.get_one::<String>("backend-url").cloned(),
            Some("https://api.neotech.example".to_string())
        );
        assert_eq!(
            matches.get_one::<u64>("identity-timeout").copied(),
            Some(10)
        );
        assert!(matches.get_flag("secure-cookies"));
    }

    #[test]
    fn test_defaults() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "neotech-web",
            "--backend-url",
            "http://localhost:8000",
        ]);

        assert_eq!(matches.get_one::<u16>("port").copied(), Some(8080));
        assert_eq!(matches.get_one::<u64>("identity-timeout").copied(), Some(5));
        assert!(!matches.get_flag("secure-cookies"));
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("NEOTECH_PORT", Some("443")),
                ("NEOTECH_BACKEND_URL", Some("https://api.neotech.example")),
                ("NEOTECH_IDENTITY_TIMEOUT", Some("3")),
                ("NEOTECH_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["neotech-web"]);
                assert_eq!(matches.get_one::<u16>("port").copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>("backend-url").cloned(),
                    Some("https://api.neotech.example".to_string())
                );
                assert_eq!(matches.get_one::<u64>("identity-timeout").copied(), Some(3));
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("NEOTECH_LOG_LEVEL", Some(level)),
                    ("NEOTECH_BACKEND_URL", Some("http://localhost:8000")),
                ],
                || {
                    let command = new();
                    let matches = command.get_matches_from(vec!["neotech-web"]);
                    assert_eq!(
                        matches.get_one::<u8>("verbosity").copied(),
                        Some(index as u8)
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("NEOTECH_LOG_LEVEL", None::<String>)], || {
                let mut args = vec![
                    "neotech-web".to_string(),
                    "--backend-url".to_string(),
                    "http://localhost:8000".to_string(),
                ];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let command = new();

                let matches = command.get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(index as u8)
                );
            });
        }
    }
}
