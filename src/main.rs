use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use smartpay_client::config::Config;
use smartpay_client::payments::registry::default_availability;
use smartpay_client::payments::{
    Country, Currency, OrangeMoneyCiClient, OtpConfirmation, PawapayClient, PaydunyaClient,
    PaymentGateway, PaymentMethod, PaymentRequest, PaymentResult, Provider, SmartPaymentClient,
    StatusQuery,
};
use smartpay_client::{AppError, AppResult};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Mobile-money payments through the smart-payment backend", long_about = None)]
struct Cli {
    /// Override the backend base URL from configuration
    #[arg(long, global = true, env = "SMARTPAY_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List payment methods available in a country
    Methods {
        #[arg(long)]
        country: Country,
        /// Use the built-in registry instead of asking the backend
        #[arg(long)]
        offline: bool,
    },
    /// Initiate a payment
    Pay {
        #[command(flatten)]
        payment: PaymentArgs,
        /// Which endpoint to send the payment to
        #[arg(long, value_enum, default_value_t = Route::Smart)]
        via: Route,
    },
    /// Check a payment's status once
    Status {
        #[arg(long)]
        payment_id: String,
        #[arg(long)]
        provider: Provider,
    },
    /// Confirm an Orange Money Côte d'Ivoire payment with its OTP
    Otp {
        #[command(flatten)]
        payment: PaymentArgs,
        /// Code obtained by dialling #144*82#
        #[arg(long)]
        code: String,
    },
    /// Probe the payment backend
    Health,
}

#[derive(clap::Args)]
struct PaymentArgs {
    #[arg(long)]
    method: PaymentMethod,
    #[arg(long)]
    amount: Decimal,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    /// Defaults to the country's main currency
    #[arg(long)]
    currency: Option<Currency>,
    #[arg(long)]
    order_id: Option<String>,
}

impl PaymentArgs {
    fn into_request(self) -> PaymentRequest {
        let mut request = PaymentRequest::new(self.method, self.amount, self.phone)
            .with_customer(self.name, self.email);
        if let Some(currency) = self.currency {
            request = request.with_currency(currency);
        }
        if let Some(order_id) = self.order_id {
            request = request.with_order(order_id);
        }
        request
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Route {
    Smart,
    Pawapay,
    Paydunya,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
        config.validate()?;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Payment backend: {}", config.api.base_url);

    match cli.command {
        Command::Methods { country, offline } => {
            let availability = if offline {
                default_availability(country)
            } else {
                SmartPaymentClient::new(&config.api)?
                    .available_methods(country)
                    .await
            };
            print_json(&availability)
        }
        Command::Pay { payment, via } => {
            let gateway: Box<dyn PaymentGateway> = match via {
                Route::Smart => Box::new(SmartPaymentClient::new(&config.api)?),
                Route::Pawapay => Box::new(PawapayClient::new(&config.api)?),
                Route::Paydunya => Box::new(PaydunyaClient::new(&config.api)?),
            };
            tracing::info!("Sending payment through {}", gateway.name());
            let request = payment.into_request();
            report(gateway.initiate_payment(&request).await)
        }
        Command::Status {
            payment_id,
            provider,
        } => {
            let client = SmartPaymentClient::new(&config.api)?;
            report(
                client
                    .check_status(&StatusQuery::new(payment_id, provider))
                    .await,
            )
        }
        Command::Otp { payment, code } => {
            let flow = OtpConfirmation::new(
                OrangeMoneyCiClient::new(&config.api)?,
                payment.into_request(),
            );
            report(flow.submit(&code).await)
        }
        Command::Health => {
            let health = SmartPaymentClient::new(&config.api)?.health_check().await;
            print_json(&health)?;
            if !health.is_healthy {
                anyhow::bail!("payment backend is unhealthy");
            }
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    notice: smartpay_client::payments::Notice,
    result: &'a PaymentResult,
}

fn report(outcome: AppResult<PaymentResult>) -> Result<()> {
    match outcome {
        Ok(result) => print_json(&Report {
            notice: result.notice(),
            result: &result,
        }),
        Err(e) => {
            print_json(&e.notice())?;
            Err(failure(e))
        }
    }
}

fn failure(e: AppError) -> anyhow::Error {
    anyhow::Error::new(e).context("payment request failed")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{}", json);
    Ok(())
}
