use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use metricsreporter::config::{DEFAULT_CONFIG_PATH, MetricsConfig, keys};
use metricsreporter::plugins::{
    debug_plugin_registry, get_filter_plugin_names, get_reporter_plugin_names, load_reporter,
};
use metricsreporter::registry::{InMemoryRegistry, MetricRegistry};
use metricsreporter::reporters::ReporterManager;
use metricsreporter::system::init_logging;

#[derive(Parser, Debug)]
#[command(name = "metricsreporter", version, about = "Configuration-driven metrics reporters")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the configured reporters against process metrics
    Run {
        /// Exit after this many seconds instead of waiting for Ctrl+C
        #[arg(long)]
        duration: Option<u64>,
    },
    /// Prepare every configured reporter once and report problems
    Check,
    /// List registered reporter and filter plugins
    Plugins,
    /// Print a sample configuration file
    SampleConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::SampleConfig => {
            print!("{}", MetricsConfig::generate_sample_config());
            Ok(())
        }
        Command::Plugins => {
            println!("{}", "Reporters:".bold());
            for name in get_reporter_plugin_names() {
                println!("  {}", name);
            }
            println!("{}", "Filters:".bold());
            for name in get_filter_plugin_names() {
                println!("  {}", name);
            }
            Ok(())
        }
        Command::Check => check(&cli.config),
        Command::Run { duration } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to build tokio runtime")?;
            runtime.block_on(run(&cli.config, duration.map(Duration::from_secs)))
        }
    }
}

fn check(path: &str) -> Result<()> {
    let config = MetricsConfig::load(path)?;
    let registry: Arc<dyn MetricRegistry> = Arc::new(InMemoryRegistry::new());
    let mut failed = 0;

    for (index, reporter_config) in config.reporter_configs().iter().enumerate() {
        let class = reporter_config.get_string(keys::CLASS).unwrap_or("<missing>");
        let result = load_reporter(class).and_then(|mut reporter| {
            let prepared = reporter.prepare(Arc::clone(&registry), reporter_config);
            reporter.close();
            prepared
        });
        match result {
            Ok(()) => println!("{} reporters[{}] {}", "ok".green(), index, class),
            Err(e) => {
                failed += 1;
                println!("{} reporters[{}] {}", "failed".red(), index, class);
                eprintln!("{}", e.format_colored());
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} reporter(s) failed to prepare", failed);
    }
    Ok(())
}

async fn run(path: &str, duration: Option<Duration>) -> Result<()> {
    let config = MetricsConfig::load(path)?;
    let _guard = init_logging(&config.logging)?;
    debug_plugin_registry();

    let registry = Arc::new(InMemoryRegistry::new());
    let mut manager = ReporterManager::new(registry.clone());
    let prepared = manager.prepare_all(&config.reporter_configs());
    if prepared == 0 {
        warn!("No metrics reporter prepared, nothing will be exported");
    }
    let started = manager.start_all();
    info!("{} metrics reporter(s) running", started);

    let sampler = tokio::spawn(sample_process_metrics(registry));
    match duration {
        Some(duration) => {
            tokio::select! {
                _ = tokio::time::sleep(duration) => {}
                _ = tokio::signal::ctrl_c() => {}
            }
        }
        None => {
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl+C")?;
        }
    }
    info!("Shutting down metrics reporters");
    sampler.abort();

    // 导出线程在 stop 中被 join，sampler 已停止，这里直接阻塞即可
    manager.stop_all();
    manager.close_all();
    Ok(())
}

/// 每秒更新一次进程级指标
async fn sample_process_metrics(registry: Arc<InMemoryRegistry>) {
    let started_at = Instant::now();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        let tick_started = Instant::now();
        ticker.tick().await;
        registry.set_gauge("process.uptime.seconds", started_at.elapsed().as_secs_f64());
        registry.inc_counter("process.heartbeats", 1);
        registry.mark("process.ticks", 1);
        registry.record_duration("process.tick.wait", tick_started.elapsed());
    }
}
