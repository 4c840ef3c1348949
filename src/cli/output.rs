// Output formatting utilities

use crate::models::{Application, Stage};
use chrono::Utc;
use std::io::IsTerminal;

// ANSI escape codes for terminal formatting
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";
const ANSI_FG_CYAN: &str = "\x1b[36m";
const ANSI_FG_GREEN: &str = "\x1b[32m";
const ANSI_FG_YELLOW: &str = "\x1b[33m";
const ANSI_FG_RED: &str = "\x1b[31m";
const ANSI_FG_BRIGHT_BLACK: &str = "\x1b[90m";

/// Check if stdout is a terminal (disables color when piped)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

fn bold_if_tty(text: &str, tty: bool) -> String {
    if tty {
        format!("{}{}{}", ANSI_BOLD, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

fn stage_color(stage: Stage) -> &'static str {
    match stage {
        Stage::ToApply => ANSI_FG_BRIGHT_BLACK,
        Stage::Applied | Stage::HrScreen | Stage::Interview => ANSI_FG_CYAN,
        Stage::Offer => ANSI_FG_GREEN,
        Stage::Rejected => ANSI_FG_RED,
        Stage::Ghosted => ANSI_FG_YELLOW,
    }
}

fn colorize_stage(stage: Stage, tty: bool) -> String {
    if tty {
        format!("{}{}{}", stage_color(stage), stage.as_str(), ANSI_RESET)
    } else {
        stage.as_str().to_string()
    }
}

/// Compact relative age, e.g. "3d", "5h", "2w"
pub fn format_age(ts: i64) -> String {
    let secs = (Utc::now().timestamp() - ts).max(0);
    match secs {
        s if s < 3600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3600),
        s if s < 7 * 86_400 => format!("{}d", s / 86_400),
        s => format!("{}w", s / (7 * 86_400)),
    }
}

/// Render the application list as an aligned table
pub fn format_application_table(apps: &[Application]) -> String {
    if apps.is_empty() {
        return "No applications found.\n".to_string();
    }
    let tty = is_tty();

    let id_w = apps
        .iter()
        .map(|a| a.id.unwrap_or(0).to_string().len())
        .max()
        .unwrap_or(2)
        .max(2);
    let company_w = apps.iter().map(|a| a.company.len()).max().unwrap_or(7).max(7);
    let role_w = apps.iter().map(|a| a.role.len()).max().unwrap_or(4).max(4);
    let stage_w = apps
        .iter()
        .map(|a| a.stage.as_str().len())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut out = String::new();
    let header = format!(
        "{:<id_w$}  {:<company_w$}  {:<role_w$}  {:<stage_w$}  {}",
        "ID", "Company", "Role", "Stage", "Age",
    );
    out.push_str(&bold_if_tty(&header, tty));
    out.push('\n');

    for app in apps {
        // Pad the plain text, then colorize, so ANSI codes don't skew widths.
        let stage_plain = format!("{:<stage_w$}", app.stage.as_str());
        let stage_cell = if tty {
            stage_plain.replace(app.stage.as_str(), &colorize_stage(app.stage, tty))
        } else {
            stage_plain
        };
        out.push_str(&format!(
            "{:<id_w$}  {:<company_w$}  {:<role_w$}  {}  {}\n",
            app.id.unwrap_or(0),
            app.company,
            app.role,
            stage_cell,
            format_age(app.created_ts),
        ));
    }
    out
}

/// Render a single application in full
pub fn format_application_detail(app: &Application) -> String {
    let mut out = String::new();
    out.push_str(&format!("ID:       {}\n", app.id.unwrap_or(0)));
    out.push_str(&format!("UUID:     {}\n", app.uuid));
    out.push_str(&format!("Company:  {}\n", app.company));
    out.push_str(&format!("Role:     {}\n", app.role));
    out.push_str(&format!("Stage:    {}\n", app.stage.as_str()));
    if let Some(url) = &app.url {
        out.push_str(&format!("URL:      {}\n", url));
    }
    if let Some(notes) = &app.notes {
        out.push_str(&format!("Notes:    {}\n", notes));
    }
    out.push_str(&format!("Age:      {}\n", format_age(app.created_ts)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(id: i64, company: &str, stage: Stage) -> Application {
        let mut a = Application::new(company.to_string(), "Engineer".to_string());
        a.id = Some(id);
        a.stage = stage;
        a
    }

    #[test]
    fn test_table_contains_columns() {
        let apps = vec![app(1, "Acme", Stage::Applied), app(2, "Globex", Stage::Offer)];
        let table = format_application_table(&apps);
        assert!(table.contains("Company"));
        assert!(table.contains("Stage"));
        assert!(table.contains("Acme"));
        assert!(table.contains("applied"));
        assert!(table.contains("offer"));
    }

    #[test]
    fn test_empty_table() {
        assert!(format_application_table(&[]).contains("No applications"));
    }

    #[test]
    fn test_format_age() {
        let now = Utc::now().timestamp();
        assert_eq!(format_age(now), "0m");
        assert_eq!(format_age(now - 2 * 3600), "2h");
        assert_eq!(format_age(now - 3 * 86_400), "3d");
        assert_eq!(format_age(now - 15 * 86_400), "2w");
    }
}
