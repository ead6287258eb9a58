use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use cocina_daemon::printing::{
    AutoPrintWorker, KitchenService, PrinterTransport, TicketRenderer, print_test_page,
};
use cocina_daemon::{Config, init_logger_with_file, print_banner};
use comanda_odoo::OdooClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment first, before anything reads variables
    dotenvy::dotenv().ok();

    // 2. Configuration (flags + ODOO_* variables)
    let config = Config::load()?;

    // 3. Logging
    init_logger_with_file("info", config.log_dir.as_deref())?;

    // 4. Printer self-test never touches the backend
    if config.print_test {
        let transport = PrinterTransport::new(config.printer_target.clone());
        print_test_page(&transport).await?;
        println!("OK: test page sent.");
        return Ok(());
    }

    // 5. Authenticate and assemble the pipeline
    let backend = config
        .backend
        .clone()
        .context("backend settings missing")?;
    let gateway = OdooClient::authenticate(
        &backend.url,
        &backend.db,
        &backend.username,
        &backend.password,
    )
    .await
    .context("could not authenticate with the backend")?;

    let transport = PrinterTransport::new(config.printer_target.clone());
    let service = KitchenService::new(
        gateway,
        transport,
        TicketRenderer::default(),
        config.service.clone(),
    );

    if config.watch {
        run_watch(service, config.auto_interval_secs).await
    } else {
        run_once(service).await
    }
}

/// One print cycle, results on stdout. This is the mode cron jobs call.
async fn run_once(service: KitchenService<OdooClient, PrinterTransport>) -> anyhow::Result<()> {
    let report = service.run_cycle().await?;

    if report.is_empty() {
        println!("No pending kitchen tickets.");
        return Ok(());
    }

    for ticket in &report.printed {
        println!("=== {} ===", ticket.order.display_name());
        println!("{}", ticket.ticket_text);
    }
    for failure in &report.failed {
        eprintln!(
            "ERROR printing {}: {}",
            failure.order.display_name(),
            failure.error
        );
    }
    println!("{}", report.summary());
    Ok(())
}

/// Stay up and print pending tickets on an interval until Ctrl-C.
async fn run_watch(
    service: KitchenService<OdooClient, PrinterTransport>,
    interval_secs: u64,
) -> anyhow::Result<()> {
    print_banner();

    let (worker, _state_rx) = AutoPrintWorker::new(Arc::new(service), interval_secs);
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(worker.run(shutdown.clone()));

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    tracing::info!("Ctrl-C received, stopping");
    shutdown.cancel();

    // An in-flight cycle drains before the task exits.
    handle.await?;
    Ok(())
}
