use chrono::Local;
use selfcheckout_client::models::{format_money, CaptureStatus, DetectionOutcome, LineId, Screen};
use selfcheckout_client::service::receipt;
use selfcheckout_client::{
    AppConfig, Camera, CaptureAttempt, DirectoryCamera, HttpCheckoutClient, PriceCatalog, SessionController,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;

type Session = SessionController<Arc<HttpCheckoutClient>, Arc<HttpCheckoutClient>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    // 加载配置 (可选参数：配置文件路径)
    let config_path = std::env::args().nth(1);
    let config = match config_path.as_deref() {
        Some(path) => AppConfig::load(Some(path))?,
        None => AppConfig::from_env(),
    };
    info!("Starting self-checkout with config: {:?}", config);

    let mut client = HttpCheckoutClient::new(
        config.server_base_url(),
        Duration::from_secs(config.server.timeout_secs),
        PriceCatalog::with_defaults(),
    )?;
    if let Err(e) = client.refresh_catalog().await {
        warn!("Catalog refresh failed, using built-in prices: {}", e);
    }

    let client = Arc::new(client);
    let camera = DirectoryCamera::new(&config.camera.capture_dir);
    if !camera.permission_granted() {
        warn!("Camera directory {} not accessible", camera.dir().display());
        println!("No access to camera");
    }

    let mut session: Session = SessionController::new(client.clone(), client);
    println!("Commands: start snap retry bill close remove <n> print clear home status quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            continue;
        };

        match cmd {
            "start" => report(session.start(), "start"),
            "snap" => match session.capture_from(&camera).await {
                Ok(CaptureAttempt::Settled(_)) => print_outcome(&session),
                Ok(CaptureAttempt::Rejected) => println!("Capture not available right now"),
                Err(e) => println!("{}", e),
            },
            "retry" => report(session.retry(), "retry"),
            "bill" => {
                if session.open_bill() {
                    print_bill(&session);
                } else {
                    println!("Bill cannot be opened now");
                }
            }
            "close" => report(session.close_bill(), "close"),
            "remove" => remove_line(&mut session, parts.next()),
            "print" => match session.print_bill().await {
                Ok(bill) => {
                    println!("Bill printed! Total: {}", format_money(&bill.total));
                    if let Some(dir) = &config.receipt.export_dir {
                        if let Err(e) = receipt::export_to_dir(&bill, Path::new(dir)) {
                            warn!("Receipt export failed: {}", e);
                        }
                    }
                }
                Err(e) => println!("{}", e),
            },
            "clear" => {
                session.reset_cart();
                println!("Cart cleared");
            }
            "home" => session.go_home(),
            "status" => match serde_json::to_string_pretty(&session.snapshot()) {
                Ok(json) => println!("{}", json),
                Err(e) => warn!("Failed to render status: {}", e),
            },
            "quit" | "exit" => break,
            other => println!("Unknown command: {}", other),
        }
        print_screen(&session);
    }

    info!("Session ended with {} items in cart", session.cart().len());
    Ok(())
}

fn report(ok: bool, action: &str) {
    if !ok {
        println!("'{}' is not valid on this screen", action);
    }
}

fn remove_line(session: &mut Session, arg: Option<&str>) {
    let Some(line_no) = arg.and_then(|a| a.parse::<usize>().ok()) else {
        println!("Usage: remove <line_no>");
        return;
    };
    let id: Option<LineId> = line_no
        .checked_sub(1)
        .and_then(|idx| session.cart().items().get(idx))
        .map(|item| item.id());

    match id.and_then(|id| session.remove_item(id)) {
        Some(item) => println!("Removed {}", item.name()),
        None => println!("No line {}", line_no),
    }
    if *session.screen() == Screen::BillOpen {
        print_bill(session);
    }
}

fn print_outcome(session: &Session) {
    if let Some(err) = session.last_error() {
        println!("{}", err);
        return;
    }
    if let Some(DetectionOutcome::Detected { name, unit_price, confidence }) = session.last_outcome() {
        println!("Product: {}", name);
        println!("Price: {}", format_money(unit_price));
        println!("Confidence: {:.0}%", confidence * 100.0);
        println!("Added to cart!");
    }
}

fn print_bill(session: &Session) {
    println!("Your Bill");
    if session.cart().is_empty() {
        println!("  Your cart is empty");
    }
    for (idx, item) in session.cart().items().iter().enumerate() {
        println!(
            "  {}. {} - {} ({:.0}%, {})",
            idx + 1,
            item.name(),
            format_money(item.unit_price()),
            item.confidence() * 100.0,
            item.added_at().with_timezone(&Local).format("%H:%M:%S"),
        );
    }
    println!("Total: {}", format_money(&session.total()));
}

fn print_screen(session: &Session) {
    let label = match session.screen() {
        Screen::Welcome => "welcome".to_string(),
        Screen::Live => format!("camera ({} in cart)", session.cart().len()),
        Screen::Reviewing(CaptureStatus::Pending) => "reviewing (detecting...)".to_string(),
        Screen::Reviewing(CaptureStatus::Settled(_)) => "reviewing".to_string(),
        Screen::BillOpen => "bill".to_string(),
    };
    println!("[{}]", label);
}
