//! CLI for lsbprobe: chi-square LSB steganalysis for PNG, BMP and JPEG.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lsbprobe")]
#[command(about = "lsbprobe: detect LSB steganography with a pixel-pair chi-square test")]
#[command(version = lsbprobe_core::VERSION)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze images and print a verdict per file.
    /// Directories are expanded to the PNG, BMP and JPEG files they contain.
    Analyze {
        /// Image files or directories
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Worker threads (default: available parallelism)
        #[arg(long)]
        jobs: Option<usize>,

        /// Output view: summary (default) or detailed (statistic breakdown)
        #[arg(long, default_value = "summary", value_parser = ["summary", "detailed"])]
        view: String,

        /// Write full results as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Write a markdown steganalysis report for a set of images
    Report {
        /// Image files or directories
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output path for report (default: print to stdout)
        #[arg(long)]
        output: Option<String>,

        /// Worker threads (default: available parallelism)
        #[arg(long)]
        jobs: Option<usize>,
    },

    /// Start an HTTP analysis server
    Server {
        /// Port to listen on
        #[arg(long, default_value_t = lsbprobe_server::DEFAULT_PORT)]
        port: u16,

        /// Bind address
        #[arg(long, default_value = lsbprobe_server::DEFAULT_HOST)]
        host: String,

        /// Largest accepted upload in MiB
        #[arg(long, default_value = "32")]
        max_upload_mb: usize,
    },
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            inputs,
            jobs,
            view,
            output,
        } => commands::analyze::run(commands::analyze::AnalyzeCommandConfig {
            inputs: &inputs,
            jobs: commands::resolve_jobs(jobs),
            view: &view,
            output_path: output.as_deref(),
        }),
        Commands::Report {
            inputs,
            output,
            jobs,
        } => commands::report::run(&inputs, output.as_deref(), commands::resolve_jobs(jobs)),
        Commands::Server {
            port,
            host,
            max_upload_mb,
        } => commands::server::run(&host, port, max_upload_mb),
    }
}
