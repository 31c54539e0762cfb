use std::path::PathBuf;
use clap::Parser;
use swedbank_lv::{ParseError, Settings, StatementInput, SwedbankParser};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;


#[derive(Parser, Debug)]
#[command(
    name = "swedbank-lv-convert",
    version,
    about = "Конвертирует CSV-выписку Swedbank LV в нормализованный CSV.",
    long_about = None,
)]
struct Args {
    /// Входной файл
    #[arg(long)]
    input: PathBuf,

    /// Выходной файл (по умолчанию stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Валюта отчёта
    #[arg(long, default_value = "EUR")]
    currency: String,

    /// Кодировка входного файла
    #[arg(long, default_value = "utf-8")]
    charset: String,

    /// Подробный лог в stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), ParseError> {
    let settings = Settings::from_strings(&args.currency, &args.charset)?;

    let parser = SwedbankParser::new(settings);
    let statement = parser.parse(StatementInput::Path(&args.input))?;

    info!(
        account = statement.account_id.as_deref().unwrap_or("-"),
        currency = %statement.currency,
        opening = ?statement.opening,
        closing = ?statement.closing,
        transactions = statement.transactions.len(),
        "statement parsed"
    );

    if statement.is_balanced() == Some(false) {
        warn!("opening balance plus transactions does not match closing balance");
    }

    match args.output {
        Some(path) => {
            let file = File::create(&path)?;
            let mut writer = BufWriter::new(file);
            statement.write_csv(&mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let handle = stdout.lock();
            statement.write_csv(handle)?;
        }
    }

    Ok(())
}
