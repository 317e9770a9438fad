// src/cli.rs
use std::{env, error::Error, path::PathBuf, time::Duration};

use crate::{
    check, harvest,
    config::options::AppOptions,
    progress::Progress,
};

enum Command {
    Harvest,
    Check,
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let (command, options) = parse_cli()?;
    let mut prog = ConsoleProgress::default();

    match command {
        Command::Harvest => {
            let (rows, path) = harvest::run(&options.harvest, Some(&mut prog))?;
            println!("Wrote {} rows → {}", rows.len(), path.display());
        }
        Command::Check => {
            let (rows, path) = check::run(&options.check, Some(&mut prog))?;
            let failed = rows
                .iter()
                .filter(|r| r.status == crate::data::StockStatus::RetryFailed)
                .count();
            println!("Wrote {} rows → {}", rows.len(), path.display());
            if failed > 0 {
                eprintln!("Warning: {failed} row(s) exhausted retries");
            }
        }
    }
    Ok(())
}

fn parse_cli() -> Result<(Command, AppOptions), Box<dyn Error>> {
    let mut command = None;
    let mut options = AppOptions::default();

    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "harvest" => command = Some(Command::Harvest),
            "check" => command = Some(Command::Check),
            "--domain" => {
                let v = args.next().ok_or("Missing value for --domain")?;
                let v = v.trim_end_matches('/').to_string();
                options.harvest.base_url = v.clone();
                options.check.base_url = v;
            }
            "-o" | "--out-dir" => {
                let v = PathBuf::from(args.next().ok_or("Missing value for --out-dir")?);
                options.harvest.out_dir = v.clone();
                options.check.out_dir = v;
            }
            "--pause" => {
                let ms: u64 = args.next().ok_or("Missing value for --pause")?.parse()?;
                options.harvest.page_pause = Duration::from_millis(ms);
            }
            "--retries" => {
                options.check.retries = args.next().ok_or("Missing value for --retries")?.parse()?;
            }
            "--timeout" => {
                let secs: u64 = args.next().ok_or("Missing value for --timeout")?.parse()?;
                options.check.wait_timeout = Duration::from_secs(secs);
            }
            "--webdriver" => {
                options.check.webdriver_url =
                    Some(args.next().ok_or("Missing value for --webdriver")?);
            }
            "-h" | "--help" => {
                eprintln!(include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown arg: {}", a).into()),
        }
    }

    let command = command.ok_or("No command given (harvest | check). See --help.")?;
    Ok((command, options))
}

#[derive(Default)]
struct ConsoleProgress {
    done: usize,
    total: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, label: &str) {
        self.done += 1;
        if self.total == 0 {
            eprintln!("  {label}");
        } else {
            eprintln!("  [{}/{}] {label}", self.done, self.total);
        }
    }
    fn item_failed(&mut self, label: &str) {
        self.done += 1;
        eprintln!("  [{}/{}] retry failed: {label}", self.done, self.total);
    }
}
