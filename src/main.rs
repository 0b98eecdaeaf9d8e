use std::{io, path::PathBuf, process};

use clap::Parser;
use trackup::{
    clients::repl,
    consts::consts::DEFAULT_DATA_DIRECTORY,
    database::{database::Database, options::DatabaseOptions},
    persistence::storage::StorageEngine,
};

/// 📇 TrackUp, a contact book driven by one-line commands
///
/// Without `--command` an interactive prompt is started, type `help` for the command list.
#[derive(Parser, Debug)]
struct Cli {
    /// Directory holding addressbook.json and preferences.json. Note: Does not support shell paths, e.g. ~
    #[clap(short, long, default_value = DEFAULT_DATA_DIRECTORY)]
    data: PathBuf,

    /// Start with an empty address book instead of loading the data directory
    #[clap(long)]
    no_restore: bool,

    /// Keep everything in memory, nothing is read from or written to disk
    #[clap(long)]
    in_memory: bool,

    /// Runs the given line and exits, can be repeated
    #[clap(short, long)]
    command: Vec<String>,
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();

    let storage_engine = if args.in_memory {
        StorageEngine::Memory
    } else {
        StorageEngine::File(args.data)
    };

    let database_options = DatabaseOptions::default()
        .set_storage_engine(storage_engine)
        .set_restore(!args.no_restore);

    let mut database = Database::open(database_options, |warning| log::warn!("{}", warning));

    let mut stdout = io::stdout();

    let session = if args.command.is_empty() {
        repl::run(&mut database, io::stdin().lock(), &mut stdout)
    } else {
        run_commands(&mut database, &args.command, &mut stdout)
    };

    if let Err(e) = session {
        log::error!("Session ended unexpectedly: {}", e);
    }

    if let Err(e) = database.shutdown() {
        log::error!("Could not save preferences: {}", e);
        process::exit(1);
    }
}

fn run_commands(
    database: &mut Database,
    lines: &[String],
    output: &mut impl io::Write,
) -> io::Result<()> {
    for line in lines {
        if !repl::run_line(database, line, output)? {
            break;
        }
    }

    Ok(())
}
