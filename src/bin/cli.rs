//! isamstore CLI Client
//!
//! Command-line interface for interacting with an isamstore server.

use clap::{Args, Parser, Subcommand};
use isamstore::network::Client;
use isamstore::{IsamError, Record};

/// isamstore CLI
#[derive(Parser, Debug)]
#[command(name = "isamstore-cli")]
#[command(about = "CLI for the isamstore record store")]
struct Cli {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

/// Record fields shared by insert and update
#[derive(Args, Debug)]
struct RecordArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    roll_no: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    marks: f64,
}

impl From<RecordArgs> for Record {
    fn from(args: RecordArgs) -> Self {
        Record::new(args.name, args.roll_no, args.email, args.marks)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert a new record
    Insert {
        key: String,

        #[command(flatten)]
        record: RecordArgs,
    },

    /// Look up a record by key
    Get { key: String },

    /// Records whose name starts with a prefix
    ByName { prefix: String },

    /// Records with marks in [min, max]
    ByMarks { min: f64, max: f64 },

    /// Records whose email contains a substring
    ByEmail { query: String },

    /// Records whose roll number contains a substring
    ByRoll { query: String },

    /// Delete a record
    Delete { key: String },

    /// Replace a record
    Update {
        key: String,

        #[command(flatten)]
        record: RecordArgs,
    },

    /// Ping the server
    Ping,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(match e {
            IsamError::NotFound(_) => 2,
            IsamError::DuplicateKey(_) => 3,
            _ => 1,
        });
    }
}

fn run(cli: Cli) -> isamstore::Result<()> {
    let mut client = Client::connect(&cli.server)?;

    match cli.command {
        Commands::Insert { key, record } => {
            client.insert(&key, &record.into())?;
            println!("Record inserted successfully");
        }
        Commands::Get { key } => println!("{}", client.search(&key)?),
        Commands::ByName { prefix } => print_records(client.search_by_name_prefix(&prefix)?),
        Commands::ByMarks { min, max } => print_records(client.search_by_marks_range(min, max)?),
        Commands::ByEmail { query } => print_records(client.search_by_email(&query)?),
        Commands::ByRoll { query } => print_records(client.search_by_roll_no(&query)?),
        Commands::Delete { key } => {
            client.delete(&key)?;
            println!("Record deleted successfully");
        }
        Commands::Update { key, record } => {
            client.update(&key, &record.into())?;
            println!("Record updated successfully");
        }
        Commands::Ping => {
            client.ping()?;
            println!("PONG");
        }
    }
    Ok(())
}

fn print_records(records: Vec<String>) {
    if records.is_empty() {
        println!("No records found.");
    }
    for record in records {
        println!("{}", record);
    }
}
