use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use storefront_cart::{CartStore, FileStore};
use storefront_catalog::ShippingAddress;
use storefront_cli::commands::browse::{self, BrowseArgs};
use storefront_cli::commands::checkout::{self, CustomerDetails};
use storefront_cli::commands::cart;
use storefront_cli::{render, CliError, ShopClient};

#[derive(Parser)]
#[command(name = "storefront-cli", version, about = "Browse the storefront and check out from the terminal")]
struct Cli {
    /// Base URL of the storefront API
    #[arg(long, env = "STOREFRONT_API", default_value = "http://localhost:3000", global = true)]
    api: String,

    /// File holding the local cart
    #[arg(long, env = "STOREFRONT_CART", default_value = ".storefront/cart.json", global = true)]
    cart_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Browse(BrowseFlags),
    /// Show one product by slug
    Show { slug: String },
    /// List categories
    Categories,
    /// Edit the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for everything in the cart
    Checkout(CheckoutFlags),
}

#[derive(Args)]
struct BrowseFlags {
    #[arg(long, default_value_t = 1)]
    page: u64,
    #[arg(long)]
    limit: Option<u64>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    min_price: Option<String>,
    #[arg(long)]
    max_price: Option<String>,
    /// Only discounted products
    #[arg(long)]
    featured: bool,
    /// price-asc, price-desc, newest or oldest
    #[arg(long)]
    sort: Option<String>,
    #[arg(long)]
    search: Option<String>,
}

#[derive(Subcommand)]
enum CartAction {
    Show,
    /// Add a product by slug
    Add {
        slug: String,
        #[arg(long, short, default_value_t = 1)]
        qty: u32,
    },
    /// Set the quantity of a line
    Update { product_id: String, qty: u32 },
    Remove { product_id: String },
    Clear,
}

#[derive(Args)]
struct CheckoutFlags {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    street: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    zip: String,
    #[arg(long)]
    country: String,
    #[arg(long)]
    payment: Option<String>,
}

impl From<BrowseFlags> for BrowseArgs {
    fn from(f: BrowseFlags) -> Self {
        BrowseArgs {
            page: f.page,
            limit: f.limit,
            category: f.category,
            min_price: f.min_price,
            max_price: f.max_price,
            featured: f.featured,
            sort: f.sort,
            search: f.search,
        }
    }
}

impl From<CheckoutFlags> for CustomerDetails {
    fn from(f: CheckoutFlags) -> Self {
        CustomerDetails {
            name: f.name,
            email: f.email,
            phone: f.phone,
            address: ShippingAddress {
                street: f.street,
                city: f.city,
                state: f.state,
                zip_code: f.zip,
                country: f.country,
            },
            payment_method: f.payment,
        }
    }
}

async fn run(cli: Cli) -> Result<String, CliError> {
    let client = ShopClient::new(cli.api);
    let mut store = CartStore::new(FileStore::new(cli.cart_file));

    let output = match cli.command {
        Commands::Browse(flags) => {
            render::product_list(&browse::browse(&client, &flags.into()).await?)
        }
        Commands::Show { slug } => render::product_page(&browse::show(&client, &slug).await?),
        Commands::Categories => browse::categories(&client).await?.join("\n") + "\n",
        Commands::Cart { action } => {
            let cart = match action {
                CartAction::Show => cart::show(&store)?,
                CartAction::Add { slug, qty } => cart::add(&client, &mut store, &slug, qty).await?,
                CartAction::Update { product_id, qty } => {
                    cart::update(&mut store, &product_id, qty)?
                }
                CartAction::Remove { product_id } => cart::remove(&mut store, &product_id)?,
                CartAction::Clear => cart::clear(&mut store)?,
            };
            render::cart(&cart)?
        }
        Commands::Checkout(flags) => {
            render::order(&checkout::place_order(&client, &mut store, flags.into()).await?)
        }
    };
    Ok(output)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("{}", format!("Error: {e}").red());
            std::process::exit(1);
        }
    }
}
