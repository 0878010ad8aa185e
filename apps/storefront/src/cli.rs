//! # Command Line Front End
//!
//! Maps subcommands onto catalog and cart operations.
//!
//! ## Commands
//! ```text
//! storefront [--db PATH] products list   [--limit N] [--page N] [--sort asc|desc] [--query Q]
//! storefront [--db PATH] products get    <PRODUCT_ID>
//! storefront [--db PATH] products create --title T --price CENTS --code C --stock N --category C ...
//!
//! storefront [--db PATH] carts create
//! storefront [--db PATH] carts get      <CART_ID>
//! storefront [--db PATH] carts add      <CART_ID> <PRODUCT_ID>
//! storefront [--db PATH] carts remove   <CART_ID> <PRODUCT_ID>
//! storefront [--db PATH] carts replace  <CART_ID> '<JSON>'
//! storefront [--db PATH] carts update   <CART_ID> <PRODUCT_ID> <QUANTITY>
//! storefront [--db PATH] carts clear    <CART_ID>
//! ```
//!
//! List parameters are taken as raw strings so lenient parsing happens in
//! one place, the catalog query.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use storefront_core::catalog::PageParams;
use storefront_core::validation::parse_line_items;
use storefront_core::{NewProduct, ValidationError};

use crate::error::ApiResult;
use crate::response::Response;
use crate::services::Storefront;

/// Storefront catalog and cart operations
#[derive(Debug, Parser)]
#[command(name = "storefront", version)]
pub struct Cli {
    /// SQLite database file (overrides STOREFRONT_DATABASE_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Catalog operations
    #[command(subcommand)]
    Products(ProductCommand),

    /// Cart operations
    #[command(subcommand)]
    Carts(CartCommand),
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// List one page of products
    List {
        #[arg(long)]
        limit: Option<String>,

        #[arg(long)]
        page: Option<String>,

        /// "asc" or "desc" by price
        #[arg(long)]
        sort: Option<String>,

        /// "available", "unavailable" or a category
        #[arg(long)]
        query: Option<String>,
    },

    /// Fetch one product
    Get { id: String },

    /// Create a product
    Create(CreateProductArgs),
}

#[derive(Debug, Args)]
pub struct CreateProductArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Price in cents
    #[arg(long = "price", allow_negative_numbers = true)]
    pub price_cents: Option<i64>,

    #[arg(long)]
    pub code: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub stock: Option<i64>,

    #[arg(long)]
    pub category: Option<String>,

    /// Availability, defaults to true
    #[arg(long)]
    pub status: Option<bool>,

    /// Thumbnail reference, repeatable
    #[arg(long = "thumbnail")]
    pub thumbnails: Vec<String>,
}

impl From<CreateProductArgs> for NewProduct {
    fn from(args: CreateProductArgs) -> Self {
        NewProduct {
            title: args.title,
            description: args.description,
            price_cents: args.price_cents,
            code: args.code,
            stock: args.stock,
            category: args.category,
            status: args.status,
            thumbnails: (!args.thumbnails.is_empty()).then_some(args.thumbnails),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Create an empty cart
    Create,

    /// Fetch a cart with product data
    Get { cart_id: String },

    /// Add one unit of a product
    Add { cart_id: String, product_id: String },

    /// Remove a product's line item
    Remove { cart_id: String, product_id: String },

    /// Replace every line item with a JSON array of {product, quantity}
    Replace { cart_id: String, body: String },

    /// Set a line item's quantity
    Update {
        cart_id: String,
        product_id: String,
        /// Integer in 1..=999; anything else is reported as a validation error
        #[arg(allow_negative_numbers = true)]
        quantity: String,
    },

    /// Remove every line item
    Clear { cart_id: String },
}

/// Runs one command against the storefront.
pub async fn execute(command: Command, storefront: &Storefront) -> ApiResult<Response> {
    match command {
        Command::Products(command) => execute_product(command, storefront).await,
        Command::Carts(command) => execute_cart(command, storefront).await,
    }
}

async fn execute_product(command: ProductCommand, storefront: &Storefront) -> ApiResult<Response> {
    let catalog = &storefront.catalog;

    let response = match command {
        ProductCommand::List {
            limit,
            page,
            sort,
            query,
        } => {
            let params = PageParams {
                limit,
                page,
                sort,
                query,
            };
            Response::page(catalog.list_products(&params).await?)
        }
        ProductCommand::Get { id } => Response::success(catalog.get_product(&id).await?),
        ProductCommand::Create(args) => Response::success(catalog.create_product(args.into()).await?),
    };

    Ok(response)
}

async fn execute_cart(command: CartCommand, storefront: &Storefront) -> ApiResult<Response> {
    let carts = &storefront.carts;

    let cart = match command {
        CartCommand::Create => return Ok(Response::success(carts.create_cart().await?)),
        CartCommand::Get { cart_id } => carts.get_cart(&cart_id).await?,
        CartCommand::Add {
            cart_id,
            product_id,
        } => carts.add_product(&cart_id, &product_id).await?,
        CartCommand::Remove {
            cart_id,
            product_id,
        } => carts.remove_product(&cart_id, &product_id).await?,
        CartCommand::Replace { cart_id, body } => {
            let items = parse_body(&body)?;
            carts.replace_all(&cart_id, items).await?
        }
        CartCommand::Update {
            cart_id,
            product_id,
            quantity,
        } => {
            let quantity = parse_quantity(&quantity)?;
            carts.update_quantity(&cart_id, &product_id, quantity).await?
        }
        CartCommand::Clear { cart_id } => carts.clear(&cart_id).await?,
    };

    Ok(Response::success(cart))
}

fn parse_quantity(raw: &str) -> Result<i64, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: format!("'{raw}' is not an integer"),
        })
}

fn parse_body(body: &str) -> Result<Vec<storefront_core::LineItem>, ValidationError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ValidationError::InvalidFormat {
            field: "products".to_string(),
            reason: e.to_string(),
        })?;

    parse_line_items(&value)
}
