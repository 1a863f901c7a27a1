// src/cli.rs

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use strum::IntoEnumIterator;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use vulnx::core::config::{FuzzerConfig, ScanOptions, VulnxConfig, ZapConfig};
use vulnx::core::context::ScanContext;
use vulnx::core::models::{ScanProfile, ScanResult, ToolName};
use vulnx::core::orchestrator::{Orchestrator, ScanEvent, SkipReason};
use vulnx::core::report::{self, ExportFormat};
use vulnx::core::scanner::fuzzer::{self, Fuzzer};
use vulnx::core::store::FindingStore;
use vulnx::core::target;

#[derive(Parser)]
#[command(name = "vulnx")]
#[command(author, version, about = "Runs nmap, nikto, sqlmap, ZAP and a path fuzzer against a target and merges their findings")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a target with a profile or an explicit tool list
    Scan(ScanArgs),

    /// Discover endpoints on a web target
    Fuzz {
        /// Target to fuzz
        #[arg(short, long)]
        target: String,

        /// Path to a wordlist file (one word per line)
        #[arg(short, long)]
        wordlist: Option<PathBuf>,

        /// Number of concurrent requests
        #[arg(long, default_value_t = 10)]
        threads: usize,
    },

    /// List the tools vulnx can drive
    Plugins,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Target URL or IP address
    #[arg(short, long)]
    pub target: String,

    /// Scan profile
    #[arg(short, long, value_enum, default_value_t = ScanProfile::Quick)]
    pub profile: ScanProfile,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<ExportFormat>,

    /// Output filename (without extension)
    #[arg(short = 'f', long)]
    pub output_file: Option<String>,

    /// Comma-separated list of tools to use (nmap,nikto,sqlmap,zap,fuzzer)
    #[arg(long, value_delimiter = ',')]
    pub tools: Option<Vec<ToolName>>,

    /// Delay in seconds before each fuzzer request
    #[arg(long, default_value_t = 0.1)]
    pub rate_limit: f64,

    /// Number of concurrent fuzzer requests
    #[arg(long, default_value_t = 10)]
    pub threads: usize,

    /// OWASP ZAP host
    #[arg(long, env = "VULNX_ZAP_HOST", default_value = "localhost")]
    pub zap_host: String,

    /// OWASP ZAP port
    #[arg(long, env = "VULNX_ZAP_PORT", default_value_t = 8080)]
    pub zap_port: u16,

    /// OWASP ZAP API key
    #[arg(long, env = "VULNX_ZAP_API_KEY", hide_env_values = true)]
    pub zap_api_key: Option<String>,

    /// SQLMap test level, overriding the profile default
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub sqlmap_level: Option<u8>,

    /// Print results as a plain table instead of the live dashboard
    #[arg(long)]
    pub plain: bool,
}

impl ScanArgs {
    fn config(&self) -> VulnxConfig {
        VulnxConfig {
            zap: ZapConfig {
                host: self.zap_host.clone(),
                port: self.zap_port,
                api_key: self.zap_api_key.clone(),
                ..ZapConfig::default()
            },
            fuzzer: FuzzerConfig {
                delay: Duration::from_secs_f64(self.rate_limit.max(0.0)),
                ..FuzzerConfig::default()
            },
            ..VulnxConfig::default()
        }
    }

    fn options(&self) -> ScanOptions {
        ScanOptions {
            threads: self.threads,
            sqlmap_level: self.sqlmap_level,
            ..ScanOptions::default()
        }
    }
}

pub async fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan(args) => scan(args).await,
        Commands::Fuzz { target, wordlist, threads } => fuzz(&target, wordlist, threads).await,
        Commands::Plugins => {
            println!("Available Plugins:");
            for tool in ToolName::iter() {
                println!("  • {:<7} - {}", tool.to_string(), tool.description());
            }
            Ok(())
        }
    }
}

async fn scan(args: ScanArgs) -> Result<()> {
    // Reject bad input before any tool is probed or the terminal is taken over.
    let scan_target = target::validate(&args.target)?;

    let config = args.config();
    let options = args.options();
    let ctx = ScanContext::new(&chrono::Utc::now().format("%Y%m%dT%H%M%S").to_string());
    let mut orchestrator = Orchestrator::connect(&config, &ctx)
        .await
        .wrap_err("failed to initialize scanners")?;
    let events = orchestrator.subscribe();
    let store = Arc::new(FindingStore::new());

    let profile = args.profile;
    let tools = args.tools.clone();
    let raw_target = args.target.clone();
    let run_store = Arc::clone(&store);
    let handle = tokio::spawn(async move {
        orchestrator
            .run_scan(&run_store, &raw_target, profile, tools.as_deref(), &options)
            .await
    });

    let interactive = !args.plain && std::io::stdout().is_terminal();
    let result: Option<ScanResult> = if interactive {
        let finished = crate::run_dashboard(scan_target.url(), profile, store.clone(), events).await?;
        if finished {
            Some(handle.await??)
        } else {
            handle.abort();
            warn!("Scan interrupted by user.");
            None
        }
    } else {
        print_progress(events).await;
        Some(handle.await??)
    };

    match &result {
        Some(result) => {
            println!("\nScan Completed!");
            let used: Vec<&str> = result.tools_used.iter().map(|t| t.label()).collect();
            println!("Tools used: {}", used.join(", "));
        }
        None => println!("\nScan interrupted, showing partial results."),
    }
    println!("{}", report::render_table(&store.snapshot()));

    if let Some(format) = args.output {
        let stem = args
            .output_file
            .clone()
            .unwrap_or_else(|| report::default_file_stem(&args.target));
        let path = report::save_results(&store, format, &stem)?;
        println!("Results saved to {}", path.display());
    }
    Ok(())
}

/// Plain-mode progress: one line per tool on stderr.
async fn print_progress(mut events: UnboundedReceiver<ScanEvent>) {
    let mut total = 0;
    let mut done = 0;
    while let Some(event) = events.recv().await {
        match event {
            ScanEvent::Started { target, profile, tools } => {
                total = tools.len();
                eprintln!("Scanning {target} with {profile} profile ({total} tools)...");
            }
            ScanEvent::ToolSkipped { tool, reason } => {
                let why = match reason {
                    SkipReason::Unavailable => "not available",
                    SkipReason::ProfileTooLight => "needs deep or full profile",
                };
                eprintln!("  skipped {}: {why}", tool.label());
            }
            ScanEvent::ToolStarted { tool } => eprintln!("[{}/{total}] {}...", done + 1, tool.activity()),
            ScanEvent::ToolFinished { tool, findings } => {
                done += 1;
                eprintln!("  {} finished with {findings} findings", tool.label());
            }
            ScanEvent::Completed(_) => break,
        }
    }
}

async fn fuzz(raw_target: &str, wordlist: Option<PathBuf>, threads: usize) -> Result<()> {
    let scan_target = target::validate(raw_target)?;
    let words: Vec<String> = match wordlist {
        Some(path) => fuzzer::load_wordlist(&path)?,
        None => fuzzer::DEFAULT_FUZZ_WORDLIST.iter().map(|w| w.to_string()).collect(),
    };

    let fuzzer = Fuzzer::new(&FuzzerConfig::default(), &ScanContext::new("fuzz"))?;
    println!("Fuzzing {} with {} words...", scan_target.url(), words.len());
    info!(url = scan_target.url(), words = words.len(), threads, "Standalone fuzz run.");

    let results = fuzzer.fuzz_endpoints(scan_target.url(), &words, threads).await;
    if results.is_empty() {
        println!("No endpoints discovered");
    } else {
        println!("Discovered {} endpoints:", results.len());
        for endpoint in results {
            println!("  {} - {}", endpoint.url, endpoint.status_code);
        }
    }
    Ok(())
}
