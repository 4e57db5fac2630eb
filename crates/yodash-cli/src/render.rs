//! Terminal rendering of the shell screens.
//!
//! Every function returns the text to print so tests can inspect it.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use colored::{Color, Colorize};
use yodash_application::DashboardView;
use yodash_core::model::DetectionBox;
use yodash_core::overlay::format_percent;
use yodash_core::time_ago::time_ago_str;

/// Color family of a box, parsed from a class such as `border-green-500`.
pub fn box_color(class: &str) -> Color {
    let family = class
        .split('-')
        .find(|part| !part.is_empty() && *part != "border" && !part.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or_default();
    match family {
        "red" | "rose" => Color::Red,
        "orange" | "amber" | "yellow" => Color::Yellow,
        "blue" | "sky" | "indigo" => Color::Blue,
        "purple" | "violet" | "fuchsia" | "pink" => Color::Magenta,
        "cyan" | "teal" => Color::Cyan,
        _ => Color::Green,
    }
}

pub fn loading() -> String {
    "Loading...".bright_black().to_string()
}

pub fn errored(message: &str) -> String {
    format!("Error: {message}").red().to_string()
}

pub fn sign_in_card() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=== YOLOv12 Cloud ===".bright_magenta().bold());
    let _ = writeln!(
        out,
        "{}",
        "Please sign in to access image analysis and inference services.".bright_black()
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Type {} to continue with the hosted sign-in page.", "signin".bright_cyan());
    let _ = write!(out, "{}", "Secure Login • Powered by AWS Cognito".bright_black());
    out
}

pub fn header(view: &DashboardView) -> String {
    format!(
        "{}  {}",
        "YOLOv12 Cloud · Detection Dashboard".bright_magenta().bold(),
        view.user_email
            .as_deref()
            .unwrap_or("Authenticated user")
            .bright_white()
    )
}

/// Input panel: selection, preview geometry, model and threshold.
pub fn input_panel(view: &DashboardView) -> String {
    let mut out = String::new();
    match (&view.selected_file, &view.preview_url) {
        (Some(name), Some(url)) => {
            let _ = writeln!(out, "Image loaded: {} ({})", name.bright_white(), url.bright_black());
            match view.natural_size {
                Some(natural) => {
                    let _ = writeln!(
                        out,
                        "  {}x{} shown at {:.0}x{:.0}",
                        natural.width,
                        natural.height,
                        view.displayed_size.width,
                        view.displayed_size.height
                    );
                }
                None => {
                    let _ = writeln!(out, "  {}", "preview unavailable".yellow());
                }
            }
        }
        _ => {
            let _ = writeln!(
                out,
                "{}",
                "No image loaded. Upload to preview and overlay detections.".bright_black()
            );
        }
    }
    let status = if view.is_detecting {
        "Running…".bright_yellow().to_string()
    } else {
        "Run detection".bright_black().to_string()
    };
    let _ = write!(
        out,
        "Model {} · Min confidence {:.0}% · {}",
        view.model_version.as_str().bright_cyan(),
        view.min_confidence * 100.0,
        status
    );
    out
}

fn detection_line(detection: &DetectionBox) -> String {
    format!(
        "  {} {}  {} • {}% • {}",
        format!("Box #{}", detection.bbox_id).color(box_color(&detection.color)),
        detection.label.bold(),
        detection.source,
        format_percent(detection.confidence),
        detection.status.display_label()
    )
}

/// Bounding box list after filtering.
pub fn boxes_panel(view: &DashboardView) -> String {
    let mut out = String::new();
    let query = if view.label_query.is_empty() {
        "any label".to_string()
    } else {
        format!("label contains \"{}\"", view.label_query)
    };
    let _ = writeln!(
        out,
        "{} {}  ({})",
        "Query & Filter".bold(),
        format!("{} matches", view.filtered.len()).bright_white(),
        query.bright_black()
    );
    if view.filtered.is_empty() {
        let _ = write!(
            out,
            "  {}",
            "No detections yet. Run inference to populate bounding boxes.".bright_black()
        );
    } else {
        let lines: Vec<String> = view.filtered.iter().map(detection_line).collect();
        let _ = write!(out, "{}", lines.join("\n"));
    }
    out
}

pub fn history_panel(view: &DashboardView, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Recent Runs".bold());
    if view.history.is_empty() {
        let _ = write!(out, "  {}", "No runs yet.".bright_black());
        return out;
    }
    let lines: Vec<String> = view
        .history
        .iter()
        .map(|run| {
            format!(
                "  {}  {} • {}  [{}] {}ms",
                run.source.bold(),
                run.model,
                time_ago_str(&run.timestamp, now),
                run.status,
                run.runtime
            )
        })
        .collect();
    let _ = write!(out, "{}", lines.join("\n"));
    out
}

pub fn dashboard(view: &DashboardView, now: DateTime<Utc>) -> String {
    [
        header(view),
        input_panel(view),
        boxes_panel(view),
        history_panel(view, now),
    ]
    .join("\n\n")
}
