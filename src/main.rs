use anyhow::{Context, Result};
use batch_insight::models::{FilterCriteria, QueryMessage};
use batch_insight::utils::logging::{log_aggregate, log_startup};
use batch_insight::{logger, Config, DashboardSession, Department};
use clap::{Parser, Subcommand};
use std::cmp::Reverse;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "batch-insight")]
#[command(about = "Batch selection, alerts and contextual AI queries for the academic dashboard")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (env vars still override it)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:8000/api
    #[arg(long, global = true, env = "BATCH_INSIGHT_API_URL")]
    api_url: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the batch catalog and the default selection
    Batches,
    /// Show alerts for the selected batches
    Alerts {
        /// Batches to select (defaults to the current batch)
        #[arg(short, long = "batch")]
        batches: Vec<String>,
        /// Select every batch
        #[arg(long, conflicts_with = "batches")]
        all: bool,
    },
    /// Ask a question using the selected batches as context
    Ask {
        question: String,
        #[arg(short, long = "batch")]
        batches: Vec<String>,
        #[arg(long, conflicts_with = "batches")]
        all: bool,
    },
    /// Search students
    Search {
        #[arg(short, long, default_value = "")]
        query: String,
        /// Department name or alias (e.g. "cs", "Computer Science")
        #[arg(short, long)]
        department: Option<String>,
        #[arg(long, default_value = "0.0")]
        min_cgpa: f64,
        #[arg(long, default_value = "10.0")]
        max_cgpa: f64,
    },
    /// Dashboard-wide statistics
    Stats,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("无法加载配置文件: {}", path.display()))?,
        None => Config::from_env(),
    };
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.clone();
    }
    if cli.verbose {
        config.verbose_logging = true;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    logger::init(&config);
    log_startup(&config);

    let session = DashboardSession::from_config(&config).context("无法创建 HTTP 客户端")?;

    match cli.command {
        Commands::Batches => cmd_batches(&session).await,
        Commands::Alerts { batches, all } => cmd_alerts(&session, &batches, all).await,
        Commands::Ask {
            question,
            batches,
            all,
        } => cmd_ask(&session, &question, &batches, all).await,
        Commands::Search {
            query,
            department,
            min_cgpa,
            max_cgpa,
        } => cmd_search(&session, query, department, min_cgpa, max_cgpa).await,
        Commands::Stats => cmd_stats(&session).await,
    }
}

/// 拉取目录并按命令行参数调整选择集
async fn prepare_selection(session: &DashboardSession, batches: &[String], all: bool) -> Result<()> {
    session.refresh_catalog().await.context("批次目录加载失败")?;

    if all {
        session.select_all().await;
    } else if !batches.is_empty() {
        session.select_only(batches).await;
        let selection = session.selection().await;
        for id in batches.iter().filter(|id| !selection.contains(id)) {
            warn!("⚠️ 批次不存在，已忽略: {}", id);
        }
    }

    log_aggregate(&session.aggregate().await);
    Ok(())
}

async fn cmd_batches(session: &DashboardSession) -> Result<()> {
    session.refresh_catalog().await.context("批次目录加载失败")?;

    let catalog = session.catalog().await;
    let selection = session.selection().await;
    if catalog.is_empty() {
        println!("No batches available.");
        return Ok(());
    }

    for batch in catalog.batches() {
        let marker = if selection.contains(&batch.id) { "*" } else { " " };
        let created = batch
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} {:<32} {:>6} students  {}  ({})",
            marker,
            batch.display_name(),
            batch.student_count,
            created,
            batch.id
        );
    }
    log_aggregate(&session.aggregate().await);
    Ok(())
}

async fn cmd_alerts(session: &DashboardSession, batches: &[String], all: bool) -> Result<()> {
    prepare_selection(session, batches, all).await?;

    if let Some(message) = session.alert_fetcher().state().error() {
        anyhow::bail!("预警加载失败: {}", message);
    }

    let mut alerts = session.alerts().await;
    if alerts.is_empty() {
        println!("No alerts for the selected batches.");
        return Ok(());
    }

    alerts.sort_by_key(|a| Reverse(a.severity.rank()));
    for alert in alerts {
        println!(
            "[{}/{}] {} ({} students)",
            alert.severity,
            alert.kind.as_str(),
            alert.title,
            alert.count
        );
        if !alert.description.is_empty() {
            println!("    {}", alert.description);
        }
        if let Some(details) = &alert.details {
            println!("    {}", details);
        }
        if !alert.action.is_empty() {
            println!("    → {}", alert.action);
        }
    }
    Ok(())
}

async fn cmd_ask(
    session: &DashboardSession,
    question: &str,
    batches: &[String],
    all: bool,
) -> Result<()> {
    prepare_selection(session, batches, all).await?;

    let reply = session.ask(question).await?;
    print_reply(&reply);
    Ok(())
}

fn print_reply(reply: &QueryMessage) {
    println!("{}", reply.content);
    if let Some(stats) = &reply.context_stats {
        println!(
            "\n[context] {} students, avg CGPA {:.2}, {} departments",
            stats.total_students, stats.avg_cgpa, stats.departments
        );
    }
    if let (Some(provider), Some(model)) = (&reply.provider, &reply.model) {
        info!("🤖 {} / {}", provider, model);
    }
}

async fn cmd_search(
    session: &DashboardSession,
    query: String,
    department: Option<String>,
    min_cgpa: f64,
    max_cgpa: f64,
) -> Result<()> {
    let department = department
        .map(|raw| Department::parse(&raw).with_context(|| format!("未知院系: {}", raw)))
        .transpose()?;

    let criteria = FilterCriteria::new()
        .with_query(query)
        .with_department(department)
        .with_cgpa_range(min_cgpa, max_cgpa)?;

    session.search(&criteria).await?;

    let results = session.search_results().await;
    println!("{} student(s) found", results.len());
    for student in results {
        let cgpa = student
            .cgpa
            .map(|c| format!("{:.2}", c))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<28} {:<12} {:>5}  {}",
            student.name, student.roll_number, cgpa, student.department
        );
    }
    Ok(())
}

async fn cmd_stats(session: &DashboardSession) -> Result<()> {
    session.load_dashboard().await;
    log_aggregate(&session.aggregate().await);

    let Some(stats) = session.stats().await else {
        let message = session
            .stats_fetcher()
            .state()
            .error()
            .unwrap_or("no data")
            .to_string();
        anyhow::bail!("看板统计加载失败: {}", message);
    };

    println!("Total students: {}", stats.total_students);
    println!("Average CGPA:   {:.2}", stats.average_cgpa);
    if !stats.departments.is_empty() {
        println!("\nDepartments:");
        for dept in &stats.departments {
            println!("  {:<28} {}", dept.name, dept.count);
        }
    }
    if !stats.cgpa_distribution.is_empty() {
        println!("\nCGPA distribution:");
        for bucket in &stats.cgpa_distribution {
            println!("  {:<10} {}", bucket.range, bucket.count);
        }
    }
    if !stats.top_performers.is_empty() {
        println!("\nTop performers:");
        for student in &stats.top_performers {
            println!(
                "  {:<28} {:<12} {:.2}  {}",
                student.name, student.roll_number, student.cgpa, student.department
            );
        }
    }
    Ok(())
}
