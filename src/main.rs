use std::{error::Error, process};

use clap::{command, Parser, Subcommand, ValueHint};
use log::{debug, error, info, LevelFilter};

use bugsdl::{
    config::Config,
    credentials::Credentials,
    host::{Module, QualityTier, QueryType},
    id::Id,
    module::Bugs,
    store::FileStore,
};

/// Profile to display when not built in release mode.
#[cfg(debug_assertions)]
const BUILD_PROFILE: &str = "debug";
/// Profile to display when not built release mode.
#[cfg(not(debug_assertions))]
const BUILD_PROFILE: &str = "release";

/// Group name for mutually exclusive logging options.
const ARGS_GROUP_LOGGING: &str = "logging";

/// Command line arguments as parsed by `clap`.
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Secrets file
    ///
    /// Holds the `username` and `password` of your Bugs! account. Ensure that
    /// this file is kept secure and not shared publicly.
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath, default_value_t = String::from("secrets.toml"))]
    secrets_file: String,

    /// Session file
    ///
    /// Device id and tokens are kept here between runs.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath, default_value_t = String::from("session.toml"))]
    session_file: String,

    /// Cover resolution in pixels
    #[arg(long, default_value_t = Config::DEFAULT_COVER_SIZE)]
    cover_size: u32,

    /// Suppresses all output except warnings and errors.
    #[arg(short, long, default_value_t = false, group = ARGS_GROUP_LOGGING)]
    quiet: bool,

    /// Enable verbose logging
    ///
    /// Specify twice for trace logging.
    #[arg(short, long, action = clap::ArgAction::Count, group = ARGS_GROUP_LOGGING)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Log in with the credentials from the secrets file
    Login,

    /// Search the catalog
    Search {
        #[arg(value_enum)]
        kind: Kind,
        query: String,
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Show an artist's tracks and albums
    Artist {
        id: Id,
        /// Include compilations the artist appears on
        #[arg(long, default_value_t = false)]
        credited: bool,
    },

    /// Show an album and its tracks
    Album { id: Id },

    /// Show a track and the encoding that would be downloaded
    Track {
        id: Id,
        #[arg(long, value_enum, default_value_t = Tier::Lossless)]
        quality: Tier,
    },

    /// Print a track's lyrics
    Lyrics {
        id: Id,
        /// Print timed lyrics instead of plain text
        #[arg(long, default_value_t = false)]
        synced: bool,
    },

    /// Resolve the download URL of a track
    Stream {
        id: Id,
        #[arg(long, value_enum, default_value_t = Tier::Lossless)]
        quality: Tier,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
enum Kind {
    Track,
    Album,
    Artist,
}

impl From<Kind> for QueryType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Track => Self::Track,
            Kind::Album => Self::Album,
            Kind::Artist => Self::Artist,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
enum Tier {
    Minimum,
    Low,
    Medium,
    High,
    Lossless,
    Hifi,
}

impl From<Tier> for QualityTier {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Minimum => Self::Minimum,
            Tier::Low => Self::Low,
            Tier::Medium => Self::Medium,
            Tier::High => Self::High,
            Tier::Lossless => Self::Lossless,
            Tier::Hifi => Self::Hifi,
        }
    }
}

/// Initializes the logger facade.
///
/// The logging level is determined as follows, in order of precedence from
/// highest to lowest:
/// 1. Command line arguments
/// 2. `RUST_LOG` environment variable
/// 3. Hard coded default
///
/// # Panics
///
/// Panics when a logger facade is already initialized.
fn init_logger(config: &Args) {
    let mut logger = env_logger::Builder::from_env(
        // Note: if you change the default logging level here, then you should
        // probably also change the verbosity levels below.
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    if config.quiet || config.verbose > 0 {
        let level = match config.verbose {
            0 => {
                // Quiet and verbose are mutually exclusive, and `verbose` is 0
                // by default. So this arm means: quiet mode.
                LevelFilter::Warn
            }
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        // Filter log messages of external crates.
        logger.filter_module("bugsdl", level);
    }

    logger.init();
}

/// Runs one subcommand against a session restored from the session file.
///
/// # Errors
///
/// Returns an error when the session cannot be restored, the login fails, or
/// the vendor rejects the request.
fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = Config::default().with_cover_size(args.cover_size);
    let store = FileStore::open(&args.session_file)?;
    let mut bugs = Bugs::new(&config, store)?;

    if args.command == Command::Login || !bugs.is_authenticated() {
        let credentials = Credentials::from_file(&args.secrets_file).inspect_err(|_| {
            info!(
                "put the username and password of your account in {}",
                args.secrets_file
            );
        })?;
        bugs.login(&credentials.username, &credentials.password)?;
        info!("logged in as {}", credentials.username);
    }

    match args.command {
        Command::Login => {}

        Command::Search { kind, query, limit } => {
            for result in bugs.search(kind.into(), &query, limit)? {
                let artists = result.artists.unwrap_or_default().join(", ");
                let year = result.year.unwrap_or_default();
                let badges = result.additional.unwrap_or_default().join(" ");
                println!(
                    "{}\t{}\t{artists}\t{year}\t{badges}",
                    result.result_id, result.name
                );
            }
        }

        Command::Artist { id, credited } => {
            let artist = bugs.get_artist_info(id, credited)?;
            println!("{}", artist.name);
            println!("{} tracks", artist.tracks.len());
            for album_id in &artist.albums {
                if let Some(album) = artist.album_extra.album(*album_id) {
                    println!("{album_id}\t{}", album.title);
                }
            }
        }

        Command::Album { id } => {
            let album = bugs.get_album_info(id, None)?;
            println!(
                "{} - {} ({})",
                album.artist,
                album.name,
                album.release_year.as_deref().unwrap_or("unknown")
            );
            if let Some(cover_url) = &album.cover_url {
                println!("{cover_url}");
            }
            for track_id in &album.tracks {
                if let Some(track) = album.track_extra.track(*track_id) {
                    println!("{track_id}\t{}", track.track_title);
                }
            }
        }

        Command::Track { id, quality } => {
            let track = bugs.get_track_info(id, quality.into(), None)?;
            println!("{} - {}", track.artists.join(", "), track.name);
            println!(
                "{} ({:?}, {} kbps)",
                track.download.bitrate, track.codec, track.bitrate
            );
            if let Some(error) = &track.error {
                println!("{error}");
            }
        }

        Command::Lyrics { id, synced } => {
            let lyrics = bugs.get_track_lyrics(id)?;
            let text = if synced { lyrics.synced } else { lyrics.embedded };
            match text {
                Some(text) => println!("{text}"),
                None => info!("track {id} has no lyrics"),
            }
        }

        Command::Stream { id, quality } => {
            let track = bugs.get_track_info(id, quality.into(), None)?;
            if let Some(error) = track.error {
                return Err(error.into());
            }
            let download = bugs.get_track_download(track.download)?;
            println!("{}", download.file_url);
        }
    }

    Ok(())
}

/// Main entry point of the application.
///
/// This function initializes the logger facade, parses the command line
/// arguments, and runs the requested subcommand.
fn main() {
    // `clap` handles our command line arguments and help text.
    let args = Args::parse();
    init_logger(&args);

    // Dump command line arguments before we do anything more.
    // This aids in debugging of whatever comes next.
    debug!("Command {:#?}", args);

    let cmd = command!();
    let name = cmd.get_name().to_string();
    let version = cmd.get_version().unwrap_or("UNKNOWN").to_string();

    info!("starting {name}/{version}; {BUILD_PROFILE}");

    if let Err(e) = run(args) {
        error!("{e}");
        process::exit(1);
    }
}
