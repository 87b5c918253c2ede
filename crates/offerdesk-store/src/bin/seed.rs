//! # Seed Catalog Generator
//!
//! Populates the document store with a development catalog.
//!
//! ## Usage
//! ```bash
//! # Seed into ./data (default)
//! cargo run -p offerdesk-store --bin seed
//!
//! # Specify the document root
//! cargo run -p offerdesk-store --bin seed -- --root ./tmp/data
//!
//! # Overwrite an existing catalog
//! cargo run -p offerdesk-store --bin seed -- --force
//! ```
//!
//! ## Generated Catalog
//! Realistic agency services across three categories:
//! - Website Development (incl. a zero-priced custom-scope product that
//!   exercises the custom-price flow)
//! - Social Media
//! - Branding
//!
//! Products carry sub-products, and one sub-product carries a nested
//! sub-product, so every level of the selection flow has data to play with.

use std::env;
use std::process::ExitCode;

use tracing::{error, info};

use offerdesk_core::{Catalog, CatalogNode, Money};
use offerdesk_store::{CatalogRepository, DocumentStore};

struct Args {
    root: String,
    force: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        root: "./data".to_string(),
        force: false,
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--root" => {
                if let Some(root) = iter.next() {
                    args.root = root;
                }
            }
            "--force" => args.force = true,
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Usage: seed [--root <dir>] [--force]");
                std::process::exit(2);
            }
        }
    }

    args
}

fn euros(major: i64) -> Money {
    Money::from_cents(major * 100)
}

fn dev_catalog() -> Catalog {
    let mut catalog = Catalog::new();

    let products: [(&str, CatalogNode); 7] = [
        (
            "Website Development",
            CatalogNode::new(
                "website-basic",
                "Basic Website",
                "Five page company website on our standard stack",
                euros(500),
            )
            .with_child(
                CatalogNode::new(
                    "extra-pages",
                    "Extra Pages",
                    "Additional pages beyond the standard package",
                    euros(100),
                )
                .with_child(CatalogNode::new(
                    "translation",
                    "Translation",
                    "Translate the added pages into a second language",
                    euros(50),
                )),
            )
            .with_child(CatalogNode::new(
                "seo-setup",
                "SEO Setup",
                "Metadata, sitemap and search console configuration",
                euros(200),
            )),
        ),
        (
            "Website Development",
            CatalogNode::new(
                "website-shop",
                "Online Shop",
                "Catalog, cart and checkout with payment integration",
                euros(1200),
            )
            .with_child(CatalogNode::new(
                "product-import",
                "Product Import",
                "Bulk import of the existing product catalog",
                euros(150),
            )),
        ),
        (
            "Website Development",
            // Zero price: the operator quotes this one per project.
            CatalogNode::new(
                "website-custom",
                "Custom Build",
                "Scoped and priced per client",
                Money::zero(),
            )
            .with_child(CatalogNode::new(
                "contact-form",
                "Contact Form",
                "Custom form with spam protection",
                euros(150),
            )),
        ),
        (
            "Social Media",
            CatalogNode::new(
                "social-starter",
                "Social Starter",
                "Two platforms, eight posts per month",
                euros(300),
            ),
        ),
        (
            "Social Media",
            CatalogNode::new(
                "social-pro",
                "Social Pro",
                "Four platforms, daily posting and community management",
                euros(700),
            )
            .with_child(CatalogNode::new(
                "content-calendar",
                "Content Calendar",
                "Quarterly planned content calendar",
                euros(120),
            )),
        ),
        (
            "Branding",
            CatalogNode::new(
                "logo-design",
                "Logo Design",
                "Three concepts, two revision rounds",
                euros(400),
            ),
        ),
        (
            "Branding",
            CatalogNode::new(
                "brand-guide",
                "Brand Guide",
                "Colors, typography and usage rules",
                euros(350),
            ),
        ),
    ];

    for (category, product) in products {
        catalog
            .upsert_product(category, product)
            .expect("seed catalog nodes are valid");
    }

    catalog
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = parse_args();
    let repo = CatalogRepository::new(DocumentStore::new(&args.root));

    match repo.load().await {
        Ok(existing) if !existing.is_empty() && !args.force => {
            error!(
                root = %args.root,
                "A catalog already exists; pass --force to overwrite"
            );
            return ExitCode::FAILURE;
        }
        Ok(_) => {}
        Err(err) => {
            error!(root = %args.root, error = %err, "Failed to read existing catalog");
            return ExitCode::FAILURE;
        }
    }

    let catalog = dev_catalog();
    let categories = catalog.categories().count();
    let products = catalog.iter_products().count();

    if let Err(err) = repo.save(catalog).await {
        error!(root = %args.root, error = %err, "Failed to write catalog");
        return ExitCode::FAILURE;
    }

    info!(
        root = %args.root,
        categories = categories,
        products = products,
        "Development catalog seeded"
    );
    ExitCode::SUCCESS
}
