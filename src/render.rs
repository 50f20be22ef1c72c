//! Terminal rendering for the learner-facing surfaces.
//!
//! Functions build plain `String`s so they can be asserted on in tests;
//! `main` is the only place that prints.

use colored::Colorize;

use crate::gating::{self, Access};
use crate::progress::ProgressLedger;
use crate::store::ContentStore;
use crate::types::{ContentItem, Role};

/// Shared output for `NotFound` and `ForbiddenPrivate`. Keeping them
/// byte-identical is the information-hiding policy, not an accident.
const NOT_FOUND: &str = "No such content.\n";

pub fn render_catalog(items: &[ContentItem], role: Role) -> String {
    let mut out = String::new();
    for item in items {
        if !gating::discoverable(item, role) {
            continue;
        }
        let mut line = format!(
            "[{}] {} ({})",
            item.kind,
            item.title.bold(),
            item.slug.dimmed()
        );
        if let Some(level) = item.level {
            line.push_str(&format!(" - {level}, {}", item.duration));
        } else if !item.duration.is_empty() {
            line.push_str(&format!(" - {}", item.duration));
        }
        match gating::evaluate(Some(item), role) {
            Access::Locked => line.push_str(&format!(" {}", "[locked]".yellow())),
            Access::Open if role.is_admin() && item.locked => {
                line.push_str(&format!(" {}", "[locked]".yellow()))
            }
            _ => {}
        }
        if role.is_admin() {
            line.push_str(&format!(" {}", format!("[{}]", item.visibility).dimmed()));
        }
        out.push_str(&line);
        out.push('\n');
    }
    if out.is_empty() {
        out.push_str("No content available.\n");
    }
    out
}

pub fn render_detail(item: Option<&ContentItem>, role: Role, ledger: &ProgressLedger) -> String {
    let Some(item) = item else {
        return NOT_FOUND.to_string();
    };
    match gating::evaluate(Some(item), role) {
        Access::NotFound | Access::ForbiddenPrivate => NOT_FOUND.to_string(),
        Access::Locked => {
            let mut out = format!("{}\n{}\n\n", item.title.bold(), item.description);
            out.push_str(&format!(
                "{}\n",
                "This content is not yet available for your account.".yellow()
            ));
            out
        }
        Access::Open => {
            let mut out = format!("{}\n{}\n", item.title.bold(), item.description);
            if !item.category.is_empty() {
                out.push_str(&format!("Category: {}\n", item.category));
            }
            if let Some(level) = item.level {
                out.push_str(&format!("Level: {level}\n"));
            }
            if !item.duration.is_empty() {
                out.push_str(&format!("Duration: {}\n", item.duration));
            }
            if let Some(style) = &item.style {
                out.push_str(&format!("Style: {style}\n"));
            }
            if !item.tags.is_empty() {
                out.push_str(&format!("Tags: {}\n", item.tags.join(", ")));
            }

            for module in &item.modules {
                out.push_str(&format!("\n{}. {}\n", module.order, module.title.bold()));
                if let Some(description) = &module.description {
                    out.push_str(&format!("   {description}\n"));
                }
                for lesson in &module.lessons {
                    let check = if ledger.is_complete(&lesson.id) {
                        "[x]".green().to_string()
                    } else {
                        "[ ]".to_string()
                    };
                    let mut line = format!(
                        "   {} {}.{} {} {}",
                        check,
                        module.order,
                        lesson.order,
                        lesson.title,
                        format!("({})", lesson.id).dimmed()
                    );
                    if !gating::lesson_openable(item, lesson, role) {
                        line.push_str(&format!(" {}", "[locked]".yellow()));
                    }
                    out.push_str(&line);
                    out.push('\n');
                }
            }

            if item.lesson_count() > 0 {
                let (completed, total) = ledger.summary(item);
                out.push_str(&format!(
                    "\nProgress: {completed} of {total} lessons completed\n"
                ));
            }
            out
        }
    }
}

pub fn render_progress(item: Option<&ContentItem>, role: Role, ledger: &ProgressLedger) -> String {
    let Some(item) = item else {
        return NOT_FOUND.to_string();
    };
    match gating::evaluate(Some(item), role) {
        Access::NotFound | Access::ForbiddenPrivate => NOT_FOUND.to_string(),
        Access::Locked => "This content is not yet available for your account.\n".to_string(),
        Access::Open => {
            let (completed, total) = ledger.summary(item);
            format!("{}: {completed} of {total} lessons completed\n", item.title)
        }
    }
}

/// One line per item: id, sync state, title. Makes the two-phase commit
/// observable from the terminal.
pub fn render_sync_report(store: &ContentStore) -> String {
    let mut out = String::new();
    if let Some(error) = store.error() {
        out.push_str(&format!("{} {error}\n\n", "warning:".yellow()));
    }
    for item in store.items() {
        let status = match store.sync_status(&item.id) {
            Some(status) => status.to_string(),
            None => "local".to_string(),
        };
        out.push_str(&format!("{:<10} {:<42} {}\n", status, item.id, item.title));
    }
    out
}
