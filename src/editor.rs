//! Interactive admin editor.
//!
//! Every flow operates on a working copy (a deep clone of the store's
//! entry); nothing reaches the canonical collection until the caller commits
//! the returned item through the store's upsert.

use dialoguer::{Confirm, Input, Select};

use crate::error::{ServiceError, ServiceResult};
use crate::ids;
use crate::types::{ContentItem, ContentType, Lesson, Level, Module, Visibility, DEFAULT_STYLE};

pub enum EditOutcome {
    Commit(ContentItem),
    Discard,
}

fn derr(e: dialoguer::Error) -> ServiceError {
    match e {
        dialoguer::Error::IO(io) => ServiceError::Io(io),
    }
}

fn prompt_text(prompt: &str, initial: &str) -> ServiceResult<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .map_err(derr)
}

fn prompt_optional(prompt: &str, initial: Option<&str>) -> ServiceResult<Option<String>> {
    let value = prompt_text(prompt, initial.unwrap_or(""))?;
    let value = value.trim().to_string();
    Ok(if value.is_empty() { None } else { Some(value) })
}

fn select(prompt: &str, options: &[&str], default: usize) -> ServiceResult<usize> {
    Select::new()
        .with_prompt(prompt)
        .items(options)
        .default(default)
        .interact()
        .map_err(derr)
}

fn prompt_level(current: Option<Level>) -> ServiceResult<Option<Level>> {
    let default = match current {
        None => 0,
        Some(Level::Beginner) => 1,
        Some(Level::Intermediate) => 2,
        Some(Level::Advanced) => 3,
    };
    let choice = select(
        "Level",
        &["(none)", "beginner", "intermediate", "advanced"],
        default,
    )?;
    Ok(match choice {
        1 => Some(Level::Beginner),
        2 => Some(Level::Intermediate),
        3 => Some(Level::Advanced),
        _ => None,
    })
}

fn prompt_visibility(current: Visibility) -> ServiceResult<Visibility> {
    let default = match current {
        Visibility::Public => 0,
        Visibility::Private => 1,
        Visibility::ComingSoon => 2,
    };
    let choice = select("Visibility", &["public", "private", "coming_soon"], default)?;
    Ok(match choice {
        1 => Visibility::Private,
        2 => Visibility::ComingSoon,
        _ => Visibility::Public,
    })
}

/// Prompt-driven creation of a fresh item with a generated id and no
/// modules. Modules are added through the edit flow afterwards.
pub fn create_item_interactive(kind: ContentType) -> ServiceResult<ContentItem> {
    let title: String = Input::new()
        .with_prompt("Title")
        .interact_text()
        .map_err(derr)?;

    let mut item = ContentItem::new(ids::new_item_id(kind), kind, title);
    let slug = prompt_text("Slug", &item.slug)?;
    if !slug.trim().is_empty() {
        item.slug = ids::slugify(&slug);
    }
    item.description = prompt_text("Description", "")?;
    item.category = prompt_text("Category", "")?;
    item.level = prompt_level(None)?;
    item.duration = prompt_text("Duration (display text)", "")?;
    item.visibility = prompt_visibility(Visibility::Public)?;
    item.locked = Confirm::new()
        .with_prompt("Lock content?")
        .default(false)
        .interact()
        .map_err(derr)?;
    Ok(item)
}

/// Menu loop over a working copy. Returns `Commit` with the edited clone or
/// `Discard` leaving the original untouched.
pub fn edit_item_interactive(original: &ContentItem) -> ServiceResult<EditOutcome> {
    let mut working = original.clone();
    loop {
        let choice = select(
            &format!("Editing '{}'", working.title),
            &[
                "Edit title",
                "Edit description",
                "Edit category",
                "Edit level",
                "Edit duration",
                "Edit thumbnail URL",
                "Set visibility",
                "Toggle lock",
                "Set style",
                "Edit tags",
                "Manage modules",
                "Save and exit",
                "Discard changes",
            ],
            11,
        )?;
        match choice {
            0 => working.title = prompt_text("Title", &working.title)?,
            1 => working.description = prompt_text("Description", &working.description)?,
            2 => working.category = prompt_text("Category", &working.category)?,
            3 => working.level = prompt_level(working.level)?,
            4 => working.duration = prompt_text("Duration", &working.duration)?,
            5 => working.thumbnail_url = prompt_text("Thumbnail URL", &working.thumbnail_url)?,
            6 => working.visibility = prompt_visibility(working.visibility)?,
            7 => working.locked = !working.locked,
            8 => {
                let style = prompt_text(
                    &format!("Style ('{DEFAULT_STYLE}' clears)"),
                    working.style.as_deref().unwrap_or(DEFAULT_STYLE),
                )?;
                working.set_style(&style);
            }
            9 => {
                let joined = working.tags.join(", ");
                let edited = prompt_text("Tags (comma separated)", &joined)?;
                working.tags = edited
                    .split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
            }
            10 => edit_modules(&mut working)?,
            11 => return Ok(EditOutcome::Commit(working)),
            _ => return Ok(EditOutcome::Discard),
        }
    }
}

fn edit_modules(item: &mut ContentItem) -> ServiceResult<()> {
    loop {
        let mut options: Vec<String> = item
            .modules
            .iter()
            .map(|m| format!("{}. {} ({} lessons)", m.order, m.title, m.lessons.len()))
            .collect();
        options.push("Add module".to_string());
        options.push("Back".to_string());
        let labels: Vec<&str> = options.iter().map(String::as_str).collect();
        let choice = select("Modules", &labels, labels.len() - 1)?;

        if choice == item.modules.len() {
            let title: String = Input::new()
                .with_prompt("Module title")
                .interact_text()
                .map_err(derr)?;
            let mut module = Module::new(ids::new_module_id(), title);
            module.order = (item.modules.len() + 1) as u32;
            item.modules.push(module);
        } else if choice < item.modules.len() {
            edit_module(item, choice)?;
        } else {
            return Ok(());
        }
    }
}

fn edit_module(item: &mut ContentItem, index: usize) -> ServiceResult<()> {
    loop {
        let module = &item.modules[index];
        let mut options: Vec<String> = module
            .lessons
            .iter()
            .map(|l| format!("Edit lesson {}. {}", l.order, l.title))
            .collect();
        options.push("Rename module".to_string());
        options.push("Edit module description".to_string());
        options.push("Move module up".to_string());
        options.push("Move module down".to_string());
        options.push("Add lesson".to_string());
        options.push("Remove module".to_string());
        options.push("Back".to_string());
        let labels: Vec<&str> = options.iter().map(String::as_str).collect();
        let lesson_count = item.modules[index].lessons.len();
        let choice = select(&format!("Module '{}'", item.modules[index].title), &labels, labels.len() - 1)?;

        if choice < lesson_count {
            edit_lesson(&mut item.modules[index].lessons[choice])?;
            continue;
        }
        match choice - lesson_count {
            0 => {
                let module = &mut item.modules[index];
                module.title = prompt_text("Module title", &module.title)?;
            }
            1 => {
                let module = &mut item.modules[index];
                module.description =
                    prompt_optional("Module description", module.description.as_deref())?;
            }
            2 => {
                move_module(item, index, -1);
                return Ok(());
            }
            3 => {
                move_module(item, index, 1);
                return Ok(());
            }
            4 => {
                let title: String = Input::new()
                    .with_prompt("Lesson title")
                    .interact_text()
                    .map_err(derr)?;
                let module = &mut item.modules[index];
                let mut lesson = Lesson::new(ids::new_lesson_id(), title);
                lesson.order = (module.lessons.len() + 1) as u32;
                module.lessons.push(lesson);
            }
            5 => {
                let remove = Confirm::new()
                    .with_prompt("Remove this module and its lessons?")
                    .default(false)
                    .interact()
                    .map_err(derr)?;
                if remove {
                    item.modules.remove(index);
                    item.renumber();
                    return Ok(());
                }
            }
            _ => return Ok(()),
        }
    }
}

fn edit_lesson(lesson: &mut Lesson) -> ServiceResult<()> {
    loop {
        let choice = select(
            &format!("Lesson '{}'", lesson.title),
            &[
                "Rename",
                "Edit duration",
                "Edit video URL",
                "Edit notes text",
                "Edit PDF URL",
                "Toggle lock",
                "Back",
            ],
            6,
        )?;
        match choice {
            0 => lesson.title = prompt_text("Lesson title", &lesson.title)?,
            1 => lesson.duration = prompt_optional("Duration", lesson.duration.as_deref())?,
            2 => lesson.video_url = prompt_optional("Video URL", lesson.video_url.as_deref())?,
            3 => {
                lesson.notes_text =
                    prompt_optional("Notes (\\n for paragraph breaks)", lesson.notes_text.as_deref())?
                        .map(|t| t.replace("\\n", "\n"));
            }
            4 => lesson.pdf_url = prompt_optional("PDF URL", lesson.pdf_url.as_deref())?,
            5 => lesson.locked = !lesson.locked,
            _ => return Ok(()),
        }
    }
}

/// Shift a module one slot up or down, renumbering afterwards so `order`
/// stays contiguous.
pub fn move_module(item: &mut ContentItem, index: usize, delta: i32) {
    let len = item.modules.len();
    if len == 0 || index >= len {
        return;
    }
    let target = index as i64 + delta as i64;
    if target < 0 || target >= len as i64 {
        return;
    }
    item.modules.swap(index, target as usize);
    // orders follow positions
    for (i, module) in item.modules.iter_mut().enumerate() {
        module.order = (i + 1) as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with_three_modules() -> ContentItem {
        let mut item = ContentItem::new(
            "course_e".to_string(),
            ContentType::Course,
            "Editable".to_string(),
        );
        for (i, name) in ["One", "Two", "Three"].iter().enumerate() {
            let mut m = Module::new(format!("mod_{name}"), name.to_string());
            m.order = (i + 1) as u32;
            item.modules.push(m);
        }
        item
    }

    #[test]
    fn move_module_swaps_and_renumbers() {
        let mut item = item_with_three_modules();
        move_module(&mut item, 2, -1);
        let titles: Vec<&str> = item.modules.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Three", "Two"]);
        let orders: Vec<u32> = item.modules.iter().map(|m| m.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn move_module_clamps_at_the_edges() {
        let mut item = item_with_three_modules();
        move_module(&mut item, 0, -1);
        move_module(&mut item, 2, 1);
        let titles: Vec<&str> = item.modules.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
    }
}
