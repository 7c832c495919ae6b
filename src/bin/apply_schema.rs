use clap::Parser;
use mongoschema::prelude::*;
use mongoschema::ApplyReport;
use std::process::ExitCode;
use tracing::info;

/// Fetch the JSON Schema at SCHEMA_URL and install it as the validator of
/// COLLECTION_NAME in DB_NAME
#[derive(Parser, Debug)]
#[command(name = "apply-schema", version)]
#[command(about = "Apply a JSON Schema as a MongoDB collection validator", long_about = None)]
struct Args {
    /// Translate and check the schema, print the collMod command, touch nothing
    #[arg(long)]
    dry_run: bool,

    /// Require a top-level bsonType in addition to properties
    #[arg(long)]
    strict: bool,

    /// validationLevel sent with collMod (strict, moderate, off)
    #[arg(long, default_value = "strict")]
    validation_level: ValidationLevel,

    /// validationAction sent with collMod (error, warn)
    #[arg(long, default_value = "error")]
    validation_action: ValidationAction,

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

    let dry_run = args.dry_run;
    println!("Starting schema application process...");
    match run(args).await {
        Ok(report) if dry_run => {
            println!("✅ Schema for collection '{}' is valid (dry run)", report.collection);
            ExitCode::SUCCESS
        }
        Ok(report) => {
            println!(
                "✅ Successfully applied schema to collection '{}'",
                report.collection
            );
            if !report.warnings.is_empty() {
                println!("   {} translation warning(s), see log", report.warnings.len());
            }
            println!("✅ Schema application completed successfully!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("❌ Error applying schema to MongoDB: {:#}", e);
            println!("❌ Schema application failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ApplyReport> {
    let config = ConnectionConfig::from_env()?;
    let schema_url = config.schema_url()?.to_string();
    let options = ApplyOptions {
        strictness: if args.strict { Strictness::Strict } else { Strictness::Lenient },
        level: args.validation_level,
        action: args.validation_action,
    };

    if args.dry_run {
        return preview(&config, &schema_url, options).await;
    }

    let store = MongoStore::connect(&config).await?;
    let result = SchemaApplier::new(&store, options).apply(&schema_url).await;
    store.shutdown().await;
    Ok(result?)
}

/// Run the pipeline against an empty in-process collection and print what
/// would have been sent to the server
async fn preview(
    config: &ConnectionConfig,
    schema_url: &str,
    options: ApplyOptions,
) -> anyhow::Result<ApplyReport> {
    info!("Dry run: nothing will be written to {}", config.database);
    let store = InMemoryStore::new(config.collection.clone());
    let report = SchemaApplier::new(&store, options).apply(schema_url).await?;

    if let Some(command) = store.validator() {
        let command = command.to_command(&config.collection);
        println!("{}", serde_json::to_string_pretty(&command)?);
    }
    Ok(report)
}
