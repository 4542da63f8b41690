// entsync CLI - synchronize spreadsheet rows into a remote entity store

mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use entsync_client::StoreClient;
use entsync_engine::{scheduler, IdPool, Reconciler, SyncError};
use entsync_io::{csv, xlsx, MappingConfig};

use exit_codes::{
    EXIT_CONFIG, EXIT_INPUT, EXIT_SUCCESS, EXIT_SYNC_ALLOC, EXIT_SYNC_AUTH, EXIT_SYNC_NETWORK,
    EXIT_SYNC_PROTOCOL, EXIT_SYNC_UPSTREAM, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "entsync")]
#[command(about = "Synchronize spreadsheet rows into a remote entity store")]
#[command(version)]
#[command(after_help = "\
Examples:
  entsync --config config.json --entity-type orgunit --csv units.csv
  entsync --config config.json --entity-type orgunit --xlsx units.xlsx
  ENTSYNC_API_KEY=... entsync --config config.json --entity-type orgunit --csv units.csv")]
struct Cli {
    /// Entity store API key
    #[arg(long, env = "ENTSYNC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Entity store base URL
    #[arg(long, env = "ENTSYNC_BASE_URL")]
    base_url: String,

    /// Path to the field mapping config (JSON)
    #[arg(long)]
    config: PathBuf,

    /// Entity type to synchronize into
    #[arg(long)]
    entity_type: String,

    /// CSV input file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Excel input file
    #[arg(long)]
    xlsx: Option<PathBuf>,
}

#[derive(Debug)]
struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = e.hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let api_key = resolve_api_key(cli.api_key)?;

    if cli.entity_type.trim().is_empty() {
        return Err(CliError {
            code: EXIT_USAGE,
            message: "entity type must not be empty".into(),
            hint: None,
        });
    }

    let config = MappingConfig::from_file(&cli.config).map_err(|e| CliError {
        code: EXIT_CONFIG,
        message: e,
        hint: None,
    })?;

    let rows = match pick_input(cli.csv, cli.xlsx)? {
        Input::Csv(path) => csv::read_rows(&path),
        Input::Xlsx(path) => xlsx::read_rows(&path),
    }
    .map_err(|e| CliError {
        code: EXIT_INPUT,
        message: e,
        hint: None,
    })?;

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let (record, warnings) = entsync_io::normalize(&config, row);
        for warning in warnings {
            eprintln!("warning: {warning}");
        }
        records.push(record);
    }

    let client = StoreClient::new(api_key, cli.base_url);
    let mut reconciler = Reconciler::new(&client, IdPool::new(&client));
    let report = scheduler::run(&mut reconciler, &cli.entity_type, &records)
        .map_err(sync_error_to_cli)?;

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    eprintln!("records synced: {}", report.records);
    eprintln!("deferred to second pass: {}", report.deferred);
    eprintln!("updates rejected: {}", report.rejected);

    Ok(())
}

fn resolve_api_key(flag: Option<String>) -> Result<String, CliError> {
    let key = flag.map(|k| k.trim().to_string()).unwrap_or_default();
    if key.is_empty() {
        return Err(CliError {
            code: EXIT_USAGE,
            message: "missing API key".into(),
            hint: Some("use --api-key or set ENTSYNC_API_KEY".into()),
        });
    }
    Ok(key)
}

#[derive(Debug)]
enum Input {
    Csv(PathBuf),
    Xlsx(PathBuf),
}

fn pick_input(csv: Option<PathBuf>, xlsx: Option<PathBuf>) -> Result<Input, CliError> {
    let input = match (csv, xlsx) {
        (Some(_), Some(_)) => {
            return Err(CliError {
                code: EXIT_USAGE,
                message: "provide only one of --csv or --xlsx, not both".into(),
                hint: None,
            })
        }
        (Some(path), None) => Input::Csv(path),
        (None, Some(path)) => Input::Xlsx(path),
        (None, None) => {
            return Err(CliError {
                code: EXIT_USAGE,
                message: "one of --csv or --xlsx is required".into(),
                hint: None,
            })
        }
    };

    let path = match &input {
        Input::Csv(p) | Input::Xlsx(p) => p,
    };
    if !path.exists() {
        return Err(CliError {
            code: EXIT_INPUT,
            message: format!("input file {} does not exist", path.display()),
            hint: None,
        });
    }
    Ok(input)
}

fn sync_error_to_cli(err: SyncError) -> CliError {
    let code = match &err {
        SyncError::Allocation { .. } => EXIT_SYNC_ALLOC,
        SyncError::Lookup { status, .. } | SyncError::Write { status, .. }
            if *status == 401 || *status == 403 =>
        {
            EXIT_SYNC_AUTH
        }
        SyncError::Lookup { .. } | SyncError::Write { .. } => EXIT_SYNC_UPSTREAM,
        SyncError::Network(_) => EXIT_SYNC_NETWORK,
        SyncError::Parse(_) => EXIT_SYNC_PROTOCOL,
    };
    let hint = (code == EXIT_SYNC_AUTH)
        .then(|| "check the API key and its permissions for this entity type".to_string());
    CliError {
        code,
        message: err.to_string(),
        hint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_api_key_trims() {
        assert_eq!(resolve_api_key(Some("  k-123  ".into())).unwrap(), "k-123");
    }

    #[test]
    fn resolve_api_key_rejects_empty() {
        assert_eq!(resolve_api_key(Some("   ".into())).unwrap_err().code, EXIT_USAGE);
        assert_eq!(resolve_api_key(None).unwrap_err().code, EXIT_USAGE);
    }

    #[test]
    fn pick_input_requires_exactly_one() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let path = f.path().to_path_buf();

        let err = pick_input(Some(path.clone()), Some(path.clone())).unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);

        let err = pick_input(None, None).unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);

        assert!(matches!(pick_input(Some(path.clone()), None).unwrap(), Input::Csv(_)));
        assert!(matches!(pick_input(None, Some(path)).unwrap(), Input::Xlsx(_)));
    }

    #[test]
    fn pick_input_missing_file() {
        let err = pick_input(Some(PathBuf::from("/no/such/file.csv")), None).unwrap_err();
        assert_eq!(err.code, EXIT_INPUT);
    }

    #[test]
    fn sync_error_exit_codes() {
        let auth = SyncError::Lookup { status: 401, body: String::new() };
        assert_eq!(sync_error_to_cli(auth).code, EXIT_SYNC_AUTH);

        let upstream = SyncError::Write { status: 500, body: String::new() };
        assert_eq!(sync_error_to_cli(upstream).code, EXIT_SYNC_UPSTREAM);

        let alloc = SyncError::Allocation { status: 503, body: String::new() };
        assert_eq!(sync_error_to_cli(alloc).code, EXIT_SYNC_ALLOC);

        let network = SyncError::Network("refused".into());
        assert_eq!(sync_error_to_cli(network).code, EXIT_SYNC_NETWORK);
    }
}
