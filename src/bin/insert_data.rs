use clap::Parser;
use mongoschema::prelude::*;
use mongoschema::InsertReport;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Insert the documents of a JSON file into COLLECTION_NAME in DB_NAME
#[derive(Parser, Debug)]
#[command(name = "insert-data", version)]
#[command(about = "Load a JSON file (object or array of objects) into MongoDB", long_about = None)]
struct Args {
    /// JSON file holding one object or an array of objects
    file: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = mongoschema::init_logging(&args.log_level) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    match run(&args).await {
        Ok(report) => {
            println!("✅ Inserted {} document(s)", report.count());
            if let Some(id) = report.first_id() {
                println!("   first _id: {}", id);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to load {}: {:#}", args.file.display(), e);
            println!("❌ Failed to insert data from {}: {:#}", args.file.display(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<InsertReport> {
    let config = ConnectionConfig::from_env()?;
    // Shape problems should not cost a connection.
    let batch = DataLoader::<MongoStore>::read_file(&args.file)?;

    let store = MongoStore::connect(&config).await?;
    let result = DataLoader::new(&store).insert(batch).await;
    store.shutdown().await;
    Ok(result?)
}
