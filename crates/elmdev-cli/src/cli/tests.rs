#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_task_names_parse() {
        let cases = [
            ("elm-init", "ElmInit"),
            ("html", "Html"),
            ("elm", "Elm"),
            ("build", "Build"),
            ("watch", "Watch"),
            ("start-server", "StartServer"),
            ("test", "Test"),
        ];

        for (name, variant) in cases {
            let cli = Cli::try_parse_from(["elmdev", name]).unwrap();
            assert!(format!("{:?}", cli.command).starts_with(variant), "{name}");
        }
    }

    #[test]
    fn test_server_port_override() {
        let cli = Cli::try_parse_from(["elmdev", "start-server", "--port", "9000"]).unwrap();
        match cli.command {
            Command::StartServer(args) => assert_eq!(args.port, Some(9000)),
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from(["elmdev", "test"]).unwrap();
        match cli.command {
            Command::Test(args) => assert_eq!(args.port, None),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(Cli::try_parse_from(["elmdev", "start-server", "--port", "70000"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "elmdev",
            "build",
            "--verbose",
            "--no-color",
            "--config",
            "custom.toml",
            "--cwd",
            "/project",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(cli.no_color);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert_eq!(cli.cwd, Some(PathBuf::from("/project")));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["elmdev", "-v", "-q", "build"]).is_err());
    }

    #[test]
    fn test_unknown_task_is_rejected() {
        assert!(Cli::try_parse_from(["elmdev", "deploy"]).is_err());
    }
}
