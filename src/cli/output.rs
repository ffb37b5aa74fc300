//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::model::TIMESTAMP_FORMAT;
use crate::vault::{EntryRow, Group};

/// Shown in place of a secret unless the user asks for it.
pub const MASK: &str = "••••••••";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

fn group_label(row: &EntryRow) -> String {
    match (&row.group_name, row.group_icon) {
        (Some(name), Some(icon)) => format!("{name} ({icon})"),
        (Some(name), None) => name.clone(),
        _ => String::new(),
    }
}

/// Print a table of entries (Id, Name, Login, Website, Group, Last access).
pub fn print_entries_table(rows: &[EntryRow], reveal: bool) {
    if rows.is_empty() {
        info("No matching entries.");
        tip("Run `lak add <NAME>` to add an entry.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let mut header = vec!["Id", "Name", "Login", "Website", "Group", "Last access"];
    if reveal {
        header.insert(2, "Secret");
    }
    table.set_header(header);

    for row in rows {
        let e = &row.entry;
        let mut cells = vec![
            e.id.to_string(),
            e.name.clone(),
            e.login.clone().unwrap_or_default(),
            e.website.clone().unwrap_or_default(),
            group_label(row),
            e.last_access
                .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default(),
        ];
        if reveal {
            cells.insert(2, e.secret.clone());
        }
        table.add_row(cells);
    }

    println!("{table}");
}

/// Print a single entry as `key: value` lines.
pub fn print_entry(row: &EntryRow, reveal: bool) {
    let e = &row.entry;
    let secret = if reveal { e.secret.as_str() } else { MASK };
    let field = |label: &str, value: &str| {
        println!("{} {}", style(format!("{label:>12}:")).bold(), value);
    };

    field("Id", &e.id.to_string());
    field("Name", &e.name);
    field("Secret", secret);
    field("Login", e.login.as_deref().unwrap_or("-"));
    field("Website", e.website.as_deref().unwrap_or("-"));
    let group = group_label(row);
    field("Group", if group.is_empty() { "-" } else { group.as_str() });
    let last_access = e
        .last_access
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| "-".into());
    field("Last access", &last_access);
}

/// Print a table of groups (Id, Name, Icon).
pub fn print_groups_table(groups: &[Group]) {
    if groups.is_empty() {
        info("No groups yet.");
        tip("Run `lak group add <NAME>` to create one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Icon"]);

    for g in groups {
        table.add_row(vec![g.id.to_string(), g.name.clone(), g.icon.to_string()]);
    }

    println!("{table}");
}
