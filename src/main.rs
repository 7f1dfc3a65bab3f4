//! cv-pager CLI: paginate a content flow and write the printable export
//!
//! Usage: cv-pager <flow.json> [config.json] [out-dir]

use cv_pager::{
    Change, ChangeCoordinator, ContentFlow, CoordinatorState, PagerConfig, Result, StackMeasurer,
};
use std::path::PathBuf;

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(flow_path) = args.first() else {
        println!("cv-pager: pagination engine for print-ready CVs");
        println!();
        println!("Usage: cv-pager <flow.json> [config.json] [out-dir]");
        return Ok(());
    };

    let flow = ContentFlow::from_json(&std::fs::read_to_string(flow_path)?)?;
    let config = match args.get(1) {
        Some(path) => PagerConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => PagerConfig::default(),
    };
    let out_dir = PathBuf::from(args.get(2).map(String::as_str).unwrap_or("."));
    if flow.is_empty() {
        log::warn!("{} has no content, exporting a blank page", flow_path);
    }

    let measurer = StackMeasurer::new(config.stack);
    let mut coordinator = ChangeCoordinator::new(config);
    coordinator.notify(Change::Content(flow))?;
    while coordinator.state() != CoordinatorState::Stable {
        coordinator.tick(&measurer);
    }

    let format = coordinator.page_format();
    log::info!(
        "{} page(s) on {} (usable height {:.1}px)",
        coordinator.page_count(),
        format.paper,
        format.usable_height()
    );
    for (index, offset) in coordinator.breaks().iter().enumerate() {
        println!("page {:>3}  offset {:>9.2}px", index + 1, offset);
    }

    let export = coordinator.export();
    let path = out_dir.join(coordinator.export_file_name("html", chrono::Utc::now()));
    std::fs::write(&path, export.html)?;
    println!("wrote {}", path.display());
    Ok(())
}
