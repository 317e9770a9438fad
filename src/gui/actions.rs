// src/gui/actions.rs
//
// Button handlers. Each spawns one worker thread running a pipeline with a
// GuiProgress sink; completion comes back over a channel polled in update().

use std::{sync::mpsc, thread};

use crate::{
    check, harvest, sheet,
    data::{CheckedRow, VariantRow},
    gui::app::{App, JobKind, JobOutcome, JobOutput},
    gui::progress::GuiProgress,
};

pub fn scrape_variants(app: &mut App) {
    if app.running {
        return;
    }
    app.running = true;
    app.status("Scraping variants…");
    logf!("Scrape: begin variant harvest");

    let opts = app.state.options.harvest.clone();
    let status = app.status.clone();
    let (tx, rx) = mpsc::channel();
    app.job_rx = Some(rx);

    thread::spawn(move || {
        let mut prog = GuiProgress::new(status);
        let result = harvest::run(&opts, Some(&mut prog))
            .map(|(rows, path)| JobOutput {
                headers: headers_of(&sheet::RAW_HEADERS),
                rows: rows.iter().map(variant_cells).collect(),
                path,
            })
            .map_err(|e| e.to_string());
        let _ = tx.send(JobOutcome { kind: JobKind::Harvest, result });
    });
}

pub fn check_stock(app: &mut App) {
    if app.running {
        return;
    }
    app.running = true;
    app.status("Checking stock status…");
    logf!("Check: begin stock check");

    let opts = app.state.options.check.clone();
    let status = app.status.clone();
    let (tx, rx) = mpsc::channel();
    app.job_rx = Some(rx);

    thread::spawn(move || {
        let mut prog = GuiProgress::new(status);
        let result = check::run(&opts, Some(&mut prog))
            .map(|(rows, path)| JobOutput {
                headers: headers_of(&sheet::CHECKED_HEADERS),
                rows: rows.iter().map(checked_cells).collect(),
                path,
            })
            .map_err(|e| e.to_string());
        let _ = tx.send(JobOutcome { kind: JobKind::Check, result });
    });
}

fn headers_of(names: &[&str]) -> Vec<String> {
    names.iter().map(|h| s!(*h)).collect()
}

fn variant_cells(r: &VariantRow) -> Vec<String> {
    vec![
        r.name.clone().unwrap_or_default(),
        r.sku.clone().unwrap_or_default(),
        r.price_usd.map(|p| format!("{p:.2}")).unwrap_or_default(),
        r.public_title.clone().unwrap_or_default(),
    ]
}

fn checked_cells(r: &CheckedRow) -> Vec<String> {
    let mut cells = variant_cells(&r.variant);
    cells.push(r.search_url.clone().unwrap_or_default());
    cells.push(r.product_page_url.clone().unwrap_or_default());
    cells.push(s!(r.status.as_str()));
    cells
}
