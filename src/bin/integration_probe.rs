//! Manual integration probe: runs the read-only Metronome self-checks
//! against a live account and reports each result. Exit codes: 0 all
//! checks pass, 1 a check failed, 2 the API was unreachable, 3 missing
//! credentials.

use clap::Parser;
use vocalis::domain::ports::Metering;
use vocalis::metering::PREPAID_PRODUCT_NAME;
use vocalis::utils::logger;
use vocalis::{MetronomeClient, Settings};

#[derive(Debug, Parser)]
#[command(name = "vocalis-probe")]
#[command(about = "Read-only self-check for the Metronome integration")]
struct ProbeArgs {
    #[arg(long, default_value = "vocalis.toml")]
    config: String,

    #[arg(long, help = "Enable verbose output")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ProbeArgs::parse();
    logger::init_cli_logger(args.verbose);

    println!("🔍 Vocalis metering integration probe");

    let settings = Settings::from_file(&args.config)?;
    println!("📋 Base URL: {}", settings.metronome.api_url);
    println!("📋 Rate card: {}", settings.metronome.rate_card_name);

    if !settings.metering_configured() {
        println!("❌ metronome.api_key is not configured");
        println!("💡 Set METRONOME_API_KEY (or metronome.api_key in {})", args.config);
        std::process::exit(3);
    }
    println!("✅ Credentials present");

    let client = MetronomeClient::new(&settings.metronome)?;

    // 解析 rate card 同時驗證 API 可達
    let mut failed = false;
    match client.get_rate_card(&settings.metronome.rate_card_name).await {
        Ok(Some(id)) => println!("✅ Rate card '{}' resolved: {}", settings.metronome.rate_card_name, id),
        Ok(None) => {
            println!("❌ Rate card '{}' not found", settings.metronome.rate_card_name);
            println!("💡 Create it in the Metronome dashboard first");
            failed = true;
        }
        Err(e) => {
            println!("❌ Unable to call Metronome API: {}", e);
            println!("💡 {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    }

    match client.find_prepaid_product().await {
        Ok(Some(id)) => println!("✅ Product '{}' present: {}", PREPAID_PRODUCT_NAME, id),
        Ok(None) => {
            // Not fatal: the product is created on first auto-recharge purchase
            println!("⚠️ Product '{}' not found (created on first use)", PREPAID_PRODUCT_NAME);
        }
        Err(e) => {
            println!("❌ Product lookup failed: {}", e);
            failed = true;
        }
    }

    if failed {
        println!("\n📊 Probe finished: some checks failed");
        std::process::exit(1);
    }

    println!("\n🎉 Probe finished: Metronome integration looks healthy");
    Ok(())
}
