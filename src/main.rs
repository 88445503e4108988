use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quiz_room::ClientError;
use quiz_room::config::{Overrides, SERVER_ENV, Settings};
use quiz_room::route::Route;

#[derive(Parser, Debug)]
#[command(version, about = "Terminal client for live multiplayer quiz rooms", long_about = None)]
struct Args {
    /// Quiz server base URL [env: QUIZ_SERVER]
    #[arg(short, long, global = true)]
    server: Option<String>,

    /// TOML settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// File that receives log output
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// File that keeps preferences such as the mute flag
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create and run a room as the game master
    Gm,
    /// Join a room as a player
    Join {
        /// Room code; opens the join form when omitted
        #[arg(long)]
        code: Option<String>,
        /// Display name
        #[arg(long, default_value = "")]
        name: String,
        /// Avatar emoji
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Open a shared link path such as /play/ABC123/Ana
    Open { route: String },
    /// List the question packs on the server
    Packs,
}

impl Command {
    fn route(&self) -> Route {
        match self {
            Command::Gm | Command::Packs => Route::GameMaster,
            Command::Join {
                code: Some(code),
                name,
                avatar,
            } => Route::game(code, name, avatar.as_deref()),
            Command::Join { code: None, .. } => Route::Join,
            Command::Open { route } => Route::parse(route),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ClientError> {
    let settings = Settings::load(
        args.config.as_deref(),
        std::env::var(SERVER_ENV).ok(),
        Overrides {
            server: args.server,
            log_file: args.log_file,
            prefs_file: args.prefs,
        },
    )?;
    quiz_room::logging::init(&settings.log_file)?;

    let command = args.command.unwrap_or(Command::Gm);
    if let Command::Packs = command {
        let packs = quiz_room::net::list_packs(&settings.server).await?;
        if packs.is_empty() {
            println!("No packs on {}", settings.server);
        }
        for pack in packs {
            println!("{:<32} {:>4}  {}", pack.file, pack.count, pack.title);
        }
        return Ok(());
    }

    quiz_room::client::run(settings, command.route()).await
}
