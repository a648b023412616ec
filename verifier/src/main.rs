use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, clap::ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "avc",
    version,
    about = "App model Verification Core: checks a parsed application model before code generation"
)]
struct Cli {
    /// AppModel JSON produced by the parser
    model: PathBuf,

    /// Backend description JSON (enables endpoint validation)
    #[arg(short, long)]
    backend: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Treat warnings as failures for the exit status
    #[arg(long)]
    deny_warnings: bool,

    /// Print pass progress and timing
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "avc=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    debug!(model = %cli.model.display(), format = ?cli.format, "starting");

    // ── Load inputs ──
    let app = match avc::input::load_app_model(&cli.model) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("avc: error: {}", e);
            return ExitCode::from(2);
        }
    };
    let backend = match cli.backend.as_deref().map(avc::input::load_backend).transpose() {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("avc: error: {}", e);
            return ExitCode::from(2);
        }
    };

    // ── Verify ──
    let verifier = avc::Verifier::new();
    let result = verifier.verify(&app, backend.as_ref());

    match cli.format {
        Format::Text => print!("{}", avc::report::render_text(&result)),
        Format::Json => {
            let provenance = avc::report::compute_provenance(&app, backend.as_ref());
            println!("{}", avc::report::render_json(&result, &provenance));
        }
    }

    let failed = !result.passed || (cli.deny_warnings && !result.warnings.is_empty());
    if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
