//! Operator CLI for the contract-analysis service: submit a contract from
//! the command line and poke the internal dashboard without the GUI.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    charts,
    filters::DealFilters,
    format,
    wizard::suggested_pdf_filename,
    ContractUpload, DashboardSession, NilApiClient,
};
use shared::domain::AthleteInfo;

#[derive(Parser, Debug)]
#[command(name = "nilctl", about = "NIL contract analysis service CLI")]
struct Cli {
    /// Base URL of the contract-analysis API.
    #[arg(long, env = "NIL_API_URL", default_value = "http://localhost:8000")]
    api_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a contract for analysis and print the report.
    Analyze {
        /// Contract file (pdf, doc, or docx).
        file: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        school: String,
        #[arg(long)]
        sport: String,
        #[arg(long)]
        state: String,
        /// Consent to anonymized use of the contract for improving analysis.
        #[arg(long)]
        consent: bool,
        /// Also download the rendered PDF next to the contract.
        #[arg(long)]
        pdf: bool,
    },
    /// Download the rendered PDF for a finished report.
    ReportPdf {
        report_id: String,
        /// Output path; defaults to report-<id>.pdf in the current directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the dashboard summary aggregates.
    Summary {
        #[arg(long, env = "NIL_DASHBOARD_KEY")]
        key: String,
    },
    /// List deals, optionally filtered client-side.
    Deals {
        #[arg(long, env = "NIL_DASHBOARD_KEY")]
        key: String,
        #[arg(long)]
        sport: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        school: Option<String>,
        #[arg(long)]
        risk: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        deal_type: Option<String>,
        /// Minimum total compensation in dollars.
        #[arg(long)]
        min: Option<String>,
        /// Maximum total compensation in dollars.
        #[arg(long)]
        max: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Print a single deal as pretty JSON.
    Detail {
        #[arg(long, env = "NIL_DASHBOARD_KEY")]
        key: String,
        deal_id: String,
    },
    /// Print contract-pattern analytics.
    Analytics {
        #[arg(long, env = "NIL_DASHBOARD_KEY")]
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("warn").init();
    let cli = Cli::parse();
    let client = NilApiClient::new(&cli.api_url)
        .with_context(|| format!("invalid API url {}", cli.api_url))?;

    match cli.command {
        Command::Analyze {
            file,
            name,
            email,
            school,
            sport,
            state,
            consent,
            pdf,
        } => {
            let athlete = AthleteInfo {
                name,
                email,
                school,
                sport,
                state,
                consent_to_kb: consent,
            };
            anyhow::ensure!(athlete.is_complete(), "all athlete fields are required");
            let upload = ContractUpload::from_path(&file).await?;
            let report = client.analyze(&athlete, upload).await?;
            print_report(&report);
            if pdf {
                let out = file.with_file_name(suggested_pdf_filename(&report.athlete_name));
                let bytes = client.download_report_pdf(&report.id).await?;
                tokio::fs::write(&out, bytes)
                    .await
                    .with_context(|| format!("write {}", out.display()))?;
                println!("\nsaved PDF to {}", out.display());
            }
        }
        Command::ReportPdf { report_id, out } => {
            let out = out.unwrap_or_else(|| PathBuf::from(format!("report-{report_id}.pdf")));
            let bytes = client.download_report_pdf(&report_id).await?;
            tokio::fs::write(&out, bytes)
                .await
                .with_context(|| format!("write {}", out.display()))?;
            println!("saved PDF to {}", out.display());
        }
        Command::Summary { key } => {
            let session = DashboardSession::login(client, key).await?;
            let snapshot = session.load_snapshot().await?;
            let summary = snapshot.summary;
            println!("total deals:          {}", summary.total_deals);
            println!(
                "total compensation:   {}",
                format::format_currency(Some(summary.total_compensation))
            );
            println!(
                "avg compensation:     {}",
                format::format_currency(Some(summary.average_compensation))
            );
            println!(
                "extraction success:   {:.0}%",
                summary.extraction_success_rate
            );
            println!("avg quality score:    {:.2}", summary.average_quality_score);
            if !summary.deals_by_sport.is_empty() {
                println!("\ndeals by sport:");
                for (label, value) in charts::sorted_entries(&summary.deals_by_sport) {
                    println!("  {label:<24} {}", format::format_count(value));
                }
            }
            if !summary.deals_by_risk.is_empty() {
                println!("\ndeals by risk:");
                for (label, value) in charts::sorted_entries(&summary.deals_by_risk) {
                    println!("  {label:<24} {}", format::format_count(value));
                }
            }
        }
        Command::Deals {
            key,
            sport,
            state,
            school,
            risk,
            status,
            deal_type,
            min,
            max,
            search,
        } => {
            let session = DashboardSession::login(client, key).await?;
            let snapshot = session.load_snapshot().await?;
            let filters = DealFilters {
                sport: sport.unwrap_or_default(),
                state: state.unwrap_or_default(),
                school: school.unwrap_or_default(),
                risk_level: risk.unwrap_or_default(),
                status: status.unwrap_or_default(),
                deal_type: deal_type.unwrap_or_default(),
                compensation_min: min.unwrap_or_default(),
                compensation_max: max.unwrap_or_default(),
                search_query: search.unwrap_or_default(),
            };
            let deals = filters.apply(&snapshot.deals);
            println!("{} of {} deals", deals.len(), snapshot.deals.len());
            for deal in deals {
                println!(
                    "{}  {:<22} {:<18} {:<10} {:<8} {:<12} {}",
                    deal.deal_id,
                    deal.athlete_name,
                    deal.school,
                    format::format_currency(deal.total_compensation),
                    format::risk_display(deal.overall_risk.as_deref()),
                    format::status_display(&deal.extraction_status),
                    format::format_date(&deal.created_at),
                );
            }
        }
        Command::Detail { key, deal_id } => {
            let session = DashboardSession::login(client, key).await?;
            let detail = session.deal_detail(&deal_id).await?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
        Command::Analytics { key } => {
            let session = DashboardSession::login(client, key).await?;
            let analytics = session.analytics().await?;
            println!("deals analyzed:    {}", analytics.deals_analyzed);
            println!(
                "exclusivity rate:  {}%",
                charts::exclusivity_rate(&analytics.exclusivity_breakdown)
            );
            println!("clawback rate:     {}%", analytics.clawback_rate);
            println!("perpetual rights:  {}", analytics.perpetual_rights_count);
            if !analytics.payor_type_distribution.is_empty() {
                println!("\npayor types:");
                for (label, value) in charts::sorted_entries(&analytics.payor_type_distribution) {
                    println!("  {label:<24} {}", format::format_count(value));
                }
            }
        }
    }

    Ok(())
}

fn print_report(report: &shared::domain::AnalysisReport) {
    println!("report {} for {}", report.id, report.athlete_name);
    println!(
        "overall risk: {} (generated {})",
        report.overall_risk.label(),
        report.generated_at
    );
    println!("\n{}\n", report.summary);
    for risk in &report.risks {
        println!(
            "[{}] {} ({})",
            report_level(risk.level),
            risk.title,
            risk.section
        );
        println!("  {}", risk.description);
        println!("  recommendation: {}", risk.recommendation);
    }
    if !report.key_terms.is_empty() {
        println!("\nkey terms:");
        for term in &report.key_terms {
            println!("  {}: {}", term.term, term.explanation);
        }
    }
}

fn report_level(level: shared::domain::RiskLevel) -> &'static str {
    match level {
        shared::domain::RiskLevel::Low => "LOW",
        shared::domain::RiskLevel::Medium => "MED",
        shared::domain::RiskLevel::High => "HIGH",
    }
}
