use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "ops-metrics-server",
    version,
    about = "Comparative daily metrics series for operations dashboards"
)]
pub struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
    /// IANA timezone used for calendar-day math (overrides OPS_REPORTING_TIMEZONE).
    #[arg(long)]
    pub timezone: Option<String>,
    #[arg(long, default_value_t = false)]
    pub print_openapi: bool,
}
