use anyhow::Result;
use clap::{Parser, Subcommand};
use market_cosign::config::{parse_network, Config};
use market_cosign::market::orders::{self, OrderSide};
use market_cosign::market::{DEFAULT_BASE_URL, DEFAULT_SATOSHIS, DEFAULT_TOKEN_AMOUNT};
use market_cosign::CommandResult;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "market-cosign")]
#[command(about = "Place token orders on the marketplace and co-sign the returned PSBTs", long_about = None)]
struct Cli {
    /// WIF-encoded signing key
    #[arg(long, env = "PRIV_KEY", hide_env_values = true, global = true)]
    priv_key: Option<String>,

    /// Marketplace API key (sent as a bearer token)
    #[arg(long, env = "MARKET_KEY", hide_env_values = true, global = true)]
    market_key: Option<String>,

    /// Marketplace API base URL
    #[arg(long, env = "BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Network (mainnet, testnet, signet, regtest)
    #[arg(long, default_value = "mainnet", global = true)]
    network: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a sell order
    #[command(name = "makesell")]
    MakeSell {
        token_id: String,

        /// Token amount to sell
        #[arg(default_value_t = DEFAULT_TOKEN_AMOUNT)]
        amount: u64,

        /// Asking price in satoshis
        #[arg(default_value_t = DEFAULT_SATOSHIS)]
        satoshis: u64,
    },

    /// Place a buy order
    #[command(name = "makebuy")]
    MakeBuy {
        token_id: String,

        /// Token amount to buy
        #[arg(default_value_t = DEFAULT_TOKEN_AMOUNT)]
        amount: u64,

        /// Offered satoshis
        #[arg(default_value_t = DEFAULT_SATOSHIS)]
        satoshis: u64,
    },

    /// Take a single order
    #[command(name = "take")]
    Take { order_id: String },

    /// Take several orders in one transaction
    #[command(name = "takeorders")]
    TakeOrders {
        #[arg(required = true, num_args = 1..)]
        order_ids: Vec<String>,
    },

    /// Cancel an order
    #[command(name = "cancel")]
    Cancel { order_id: String },

    /// Limit buy: spend `amount` satoshis at `price`
    #[command(name = "buylimit")]
    BuyLimit {
        token_id: String,
        price: u64,
        amount: u64,
    },

    /// Limit sell: sell `amount` tokens at `price`
    #[command(name = "selllimit")]
    SellLimit {
        token_id: String,
        price: u64,
        amount: u64,
    },

    /// Show the client's P2TR address and public key
    #[command(name = "address")]
    Address,

    /// Co-sign PSBTs locally without contacting the marketplace
    #[command(name = "cosign")]
    Cosign {
        /// JSON with psbts and toSignInputs (as returned by an order call)
        #[arg(long)]
        data: String,
    },
}

fn print_result(cmd_result: CommandResult) {
    println!("{}", cmd_result.output);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}\n", cmd_result.result);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config {
        priv_key: cli.priv_key,
        market_key: cli.market_key,
        base_url: cli.base_url,
        network: parse_network(&cli.network)?,
    };
    tracing::debug!("{:?}", config);

    let identity = config.identity()?;

    let cmd_result = match cli.command {
        Commands::MakeSell {
            token_id,
            amount,
            satoshis,
        } => orders::make_order_core(
            &identity,
            &config.transport()?,
            &token_id,
            amount,
            satoshis,
            OrderSide::Sell,
        )?,
        Commands::MakeBuy {
            token_id,
            amount,
            satoshis,
        } => orders::make_order_core(
            &identity,
            &config.transport()?,
            &token_id,
            amount,
            satoshis,
            OrderSide::Buy,
        )?,
        Commands::Take { order_id } => {
            orders::take_order_core(&identity, &config.transport()?, &order_id)?
        }
        Commands::TakeOrders { order_ids } => {
            orders::take_orders_core(&identity, &config.transport()?, &order_ids)?
        }
        Commands::Cancel { order_id } => {
            orders::cancel_order_core(&identity, &config.transport()?, &order_id)?
        }
        Commands::BuyLimit {
            token_id,
            price,
            amount,
        } => orders::buy_limit_core(&identity, &config.transport()?, &token_id, price, amount)?,
        Commands::SellLimit {
            token_id,
            price,
            amount,
        } => orders::sell_limit_core(&identity, &config.transport()?, &token_id, price, amount)?,
        Commands::Address => orders::address_core(&identity)?,
        Commands::Cosign { data } => orders::cosign_core(&identity, &data)?,
    };

    print_result(cmd_result);
    Ok(())
}
