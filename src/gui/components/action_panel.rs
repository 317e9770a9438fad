// src/gui/components/action_panel.rs

use eframe::egui::{self, widgets::Spinner};

use crate::gui::{actions, app::App};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.label("Scrape product variants from carex.com, then check their stock status.");
    ui.add_space(4.0);

    let mut open_folder_clicked = false;

    ui.horizontal(|ui| {
        let scrape = ui.add_enabled(
            !app.running,
            egui::Button::new("1. Scrape Variants"),
        );
        if scrape.clicked() {
            actions::scrape_variants(app);
        }

        let check = ui.add_enabled(
            !app.running,
            egui::Button::new("2. Check Stock Status"),
        );
        if check.clicked() {
            actions::check_stock(app);
        }

        if ui.button("📁").on_hover_text("Open output folder").clicked() {
            open_folder_clicked = true;
        }

        if app.running {
            ui.add(Spinner::new().size(16.0));
        }

        let status = app.status.lock().unwrap().clone();
        ui.label(status);
    });

    // Handle open folder after the borrow ends
    if open_folder_clicked {
        open_output_folder(app);
    }
}

/// Open the output folder in the system file explorer.
fn open_output_folder(app: &App) {
    let folder = find_nearest_existing_parent(&app.state.options.harvest.out_dir);

    let absolute = match std::fs::canonicalize(&folder) {
        Ok(p) => p,
        Err(e) => {
            let msg = format!("Cannot resolve folder path: {}", e);
            loge!("{}", msg);
            app.status(msg);
            return;
        }
    };

    if let Err(e) = open_folder_in_explorer(&absolute) {
        loge!("Failed to open folder: {}", e);
        app.status(format!("Failed to open folder: {}", e));
    } else {
        logf!("Opened folder: {}", absolute.display());
    }
}

/// Find the nearest existing parent folder by walking up the directory tree.
fn find_nearest_existing_parent(path: &std::path::Path) -> std::path::PathBuf {
    let mut current = path.to_path_buf();
    loop {
        if current.exists() && current.is_dir() {
            return current;
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return std::path::PathBuf::from("."),
        }
    }
}

/// Cross-platform function to open a folder in the system file explorer.
fn open_folder_in_explorer(path: &std::path::Path) -> Result<(), String> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("explorer")
            .arg(path)
            .spawn()
            .map_err(|e| format!("Failed to spawn explorer: {}", e))?;
        Ok(())
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()
            .map_err(|e| format!("Failed to spawn open: {}", e))?;
        Ok(())
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()
            .map_err(|e| format!("Failed to spawn xdg-open: {}", e))?;
        Ok(())
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        Err("Opening folders not supported on this platform".to_string())
    }
}
