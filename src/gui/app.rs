// src/gui/app.rs
use std::{
    error::Error,
    path::PathBuf,
    sync::{Arc, Mutex, mpsc},
    time::Duration,
};

use eframe::egui;

use crate::config::state::AppState;

use super::components;

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "Carex Scraper",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::default())))),
    )?;
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobKind {
    Harvest,
    Check,
}

/// Tabular view of what a finished job produced, plus where it was saved.
pub struct JobOutput {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub path: PathBuf,
}

pub struct JobOutcome {
    pub kind: JobKind,
    pub result: Result<JobOutput, String>,
}

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,

    // in-memory display of the last finished job
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,

    // status/progress (the worker thread writes here)
    pub status: Arc<Mutex<String>>,
    pub running: bool,

    // completion channel of the in-flight job, if any
    pub job_rx: Option<mpsc::Receiver<JobOutcome>>,
}

impl App {
    pub fn new(state: AppState) -> Self {
        logf!("Init: default options, out dir = {}", state.options.harvest.out_dir.display());
        Self {
            state,
            headers: Vec::new(),
            rows: Vec::new(),
            status: Arc::new(Mutex::new(s!("Idle. Run step 1, then step 2."))),
            running: false,
            job_rx: None,
        }
    }

    #[inline]
    pub fn status<T: Into<String>>(&self, msg: T) {
        *self.status.lock().unwrap() = msg.into();
    }

    /// Pick up a finished worker, if one reported in.
    fn poll_job(&mut self) {
        let polled = match &self.job_rx {
            Some(rx) => rx.try_recv(),
            None => return,
        };

        match polled {
            Ok(outcome) => {
                self.running = false;
                self.job_rx = None;
                match outcome.result {
                    Ok(out) => {
                        let what = match outcome.kind {
                            JobKind::Harvest => "Variants scraped",
                            JobKind::Check => "Stock checked",
                        };
                        self.status(format!(
                            "{what}: {} rows → {}",
                            out.rows.len(),
                            out.path.display()
                        ));
                        self.headers = out.headers;
                        self.rows = out.rows;
                    }
                    Err(e) => {
                        loge!("Job failed: {e}");
                        self.status(format!("Error: {e}"));
                    }
                }
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.running = false;
                self.job_rx = None;
                self.status("Error: worker thread died");
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_job();
        if self.running {
            // keep polling while a job runs so status stays live
            ctx.request_repaint_after(Duration::from_millis(200));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            components::action_panel::draw(ui, self);

            ui.separator();

            components::data_table::draw(ui, self);
        });
    }
}
