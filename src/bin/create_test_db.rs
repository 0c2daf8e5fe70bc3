use std::{error::Error, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;
use time::OffsetDateTime;

use uangku::{
    Email, Name, PasswordHash, ValidatedPassword, create_user, initialize_db, local_today,
    populate_demo_data,
};

/// The email address of the demo user.
const DEMO_EMAIL: &str = "demo@uangku.test";

/// The password of the demo user.
const DEMO_PASSWORD: &str = "uangku-demo-password";

/// A utility for creating a test database for the REST API server of uangku.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The timezone that decides the date of the last demo transaction.
    #[arg(long, env = "TIMEZONE", default_value = "Asia/Jakarta")]
    timezone: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.exists() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    let today = local_today(&args.timezone)?;

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating demo user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(DEMO_PASSWORD),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(
        Name::new("Demo")?,
        Email::new(DEMO_EMAIL)?,
        password_hash,
        OffsetDateTime::now_utc(),
        &conn,
    )?;

    println!("Adding wallets, transactions, a budget, a goal and bills...");
    populate_demo_data(user.id, today, &conn)?;

    println!("Success! Log in with {DEMO_EMAIL} and the password {DEMO_PASSWORD:?}");

    Ok(())
}
