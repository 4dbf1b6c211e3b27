use estate_desk::api::HttpApi;
use estate_desk::config::Config;
use estate_desk::store::{ListView, Store};
use tracing::{info, Level};
use tracing_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🏠 Estate Desk - property listings console");
    info!("==========================================");

    let cfg = Config::from_env()?;
    let api = HttpApi::new(&cfg)?;

    let mut store = Store::new();
    store.refresh(&api).await?;

    let stats = &store.dashboard().stats;
    println!("Total properties: {}", stats.total_properties);
    println!("For sale / rent: {} / {}", stats.for_sale, stats.for_rent);
    for (kind, count) in &stats.by_type {
        println!("  {kind}: {count}");
    }
    println!();

    let view = ListView::new();
    let page = view.page_of(store.properties());
    for (i, property) in page.items.iter().enumerate() {
        println!(
            "{}. {} ({}) in {}",
            i + 1,
            property.property_type,
            property.list_type,
            property.city.as_deref().unwrap_or("Unknown City"),
        );
        match property.price {
            Some(price) => println!("   Price: {price}"),
            None => println!("   Price: N/A"),
        }
        if let Some(size) = &property.size {
            println!("   Size: {} {}", size.value, size.unit);
        }
        println!("   ID: {}", property.id);
    }
    println!();
    println!("Page {} of {}", page.page, page.total_pages);

    info!("✅ Loaded {} properties", store.properties().len());

    Ok(())
}
