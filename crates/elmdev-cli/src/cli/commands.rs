use clap::{Args, Subcommand};

/// Available elmdev subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the Elm toolchain
    ///
    /// Checks that the compiler runs and creates `elm.json` pointing at the
    /// Elm source directory when the project has none.
    #[command(name = "elm-init")]
    ElmInit,

    /// Copy HTML pages into the output directory
    Html,

    /// Compile the Elm modules into the bundle
    Elm,

    /// Compile and copy once
    ///
    /// Exits with a non-zero status if any stage fails.
    Build,

    /// Rebuild whenever a source file changes
    Watch,

    /// Serve the output directory with the API proxy
    #[command(name = "start-server")]
    StartServer(ServerArgs),

    /// Build, start the server, then watch for changes
    Test(ServerArgs),
}

/// Arguments for commands that run the dev server
#[derive(Args, Debug, Clone, Default)]
pub struct ServerArgs {
    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,
}
