use clap::{Args, Subcommand};
use storefront_app::{
    database::{self, Db},
    domain::orders::{
        OrdersService, PgOrdersService,
        records::{OrderStatus, OrderUuid},
        ref_code::is_well_formed,
    },
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    SetStatus(SetStatusArgs),
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub(crate) struct SetStatusArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Order UUID
    #[arg(long)]
    order_uuid: Uuid,

    /// New status (pending, shipped, delivered, cancelled)
    #[arg(long)]
    status: String,
}

#[derive(Debug, Args)]
pub(crate) struct ShowArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Public order reference code
    #[arg(long)]
    ref_code: String,

    /// Print the order as JSON
    #[arg(long)]
    json: bool,
}

pub(crate) async fn run(command: OrderCommand) -> Result<(), String> {
    match command.command {
        OrderSubcommand::SetStatus(args) => set_status(args).await,
        OrderSubcommand::Show(args) => show(args).await,
    }
}

async fn set_status(args: SetStatusArgs) -> Result<(), String> {
    let status: OrderStatus = args
        .status
        .parse()
        .map_err(|_| format!("invalid status '{}'", args.status))?;

    let service = connect(&args.database_url).await?;

    service
        .set_status(OrderUuid::from_uuid(args.order_uuid), status)
        .await
        .map_err(|error| format!("failed to update order status: {error}"))?;

    println!("order_uuid: {}", args.order_uuid);
    println!("status: {status}");

    Ok(())
}

async fn show(args: ShowArgs) -> Result<(), String> {
    if !is_well_formed(&args.ref_code) {
        return Err(format!("'{}' is not an order reference", args.ref_code));
    }

    let service = connect(&args.database_url).await?;

    let order = service
        .get_order_by_ref(&args.ref_code)
        .await
        .map_err(|error| format!("failed to look up order: {error}"))?
        .ok_or_else(|| format!("no order with reference '{}'", args.ref_code))?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&order)
            .map_err(|error| format!("failed to render order: {error}"))?;

        println!("{rendered}");

        return Ok(());
    }

    println!("order_uuid: {}", order.uuid);
    println!("ref_code: {}", order.ref_code);
    println!("status: {}", order.status);
    println!("created_at: {}", order.created_at);
    println!("name: {}", order.name);
    println!("phone: {}", order.phone);
    println!("city: {}", order.city);
    println!("address: {}", order.address);
    println!("shipping: {} ({})", order.shipping_label, order.shipping_cost);

    for item in &order.items {
        println!(
            "item: variant={} quantity={} unit_price={}",
            item.variant_uuid, item.quantity, item.unit_price_at_purchase
        );
    }

    println!("subtotal: {}", order.subtotal());
    println!("total: {}", order.total());

    Ok(())
}

async fn connect(database_url: &str) -> Result<PgOrdersService, String> {
    let pool = database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    Ok(PgOrdersService::new(Db::new(pool)))
}
