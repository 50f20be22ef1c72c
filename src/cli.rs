use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

use crate::metadata::{PKG_DESCRIPTION, PKG_NAME, PKG_VERSION};
use crate::types::{ContentItem, ContentType, Level, Role, Visibility};

#[derive(Parser, Debug, Clone)]
#[command(name = PKG_NAME)]
#[command(version = PKG_VERSION)]
#[command(about = PKG_DESCRIPTION, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub globals: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Remote catalog base URL; unset means offline (fallback chain only)
    #[arg(long, env = "CYBERLEARN_REMOTE_URL", global = true)]
    pub remote_url: Option<String>,

    /// API key sent as a bearer token to the remote catalog
    #[arg(long, env = "CYBERLEARN_API_KEY", global = true)]
    pub api_key: Option<String>,

    /// Directory for the local mirror and progress ledger
    #[arg(long, env = "CYBERLEARN_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Caller role, as supplied by the identity provider
    #[arg(long, env = "CYBERLEARN_ROLE", default_value = "user", global = true)]
    pub role: String,
}

impl GlobalArgs {
    /// Validate CLI/environment-derived arguments.
    pub fn validate(&self) -> Result<(), String> {
        Role::from_str(&self.role)?;
        if let Some(url) = &self.remote_url {
            if url.trim().is_empty() {
                return Err("CYBERLEARN_REMOTE_URL cannot be empty when set".to_string());
            }
        }
        Ok(())
    }

    pub fn role(&self) -> Result<Role, String> {
        Role::from_str(&self.role)
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the catalog, optionally filtered by content type
    List {
        #[arg(long)]
        kind: Option<String>,
    },
    /// Show one item by content type and slug
    Show { kind: String, slug: String },
    /// Mark a lesson complete
    Complete { lesson_id: String },
    /// Show completion progress for an item
    Progress { kind: String, slug: String },
    /// Report per-item remote sync state
    Sync,
    /// Content management (requires the admin role)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Print version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminAction {
    /// Create an item; interactive unless --title is given
    New {
        #[arg(long)]
        kind: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Edit an item through the interactive editor
    Edit { kind: String, slug: String },
    /// Update item fields without prompts
    Set {
        kind: String,
        slug: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete an item
    Delete {
        kind: String,
        slug: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Scripting-surface field overrides shared by `admin new` and `admin set`.
#[derive(Args, Debug, Clone, Default)]
pub struct FieldArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub slug: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub level: Option<String>,
    #[arg(long)]
    pub duration: Option<String>,
    #[arg(long)]
    pub thumbnail_url: Option<String>,
    #[arg(long)]
    pub visibility: Option<String>,
    #[arg(long)]
    pub locked: Option<bool>,
    /// Presentation style; 'default' clears it
    #[arg(long)]
    pub style: Option<String>,
    /// Replace the tag list (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

impl FieldArgs {
    /// Apply the provided overrides to a working copy. Absent flags leave
    /// fields untouched; `--tag` replaces the whole list.
    pub fn apply(&self, item: &mut ContentItem) -> Result<(), String> {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(slug) = &self.slug {
            item.slug = crate::ids::slugify(slug);
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(category) = &self.category {
            item.category = category.clone();
        }
        if let Some(level) = &self.level {
            item.level = Some(Level::from_str(level)?);
        }
        if let Some(duration) = &self.duration {
            item.duration = duration.clone();
        }
        if let Some(thumbnail_url) = &self.thumbnail_url {
            item.thumbnail_url = thumbnail_url.clone();
        }
        if let Some(visibility) = &self.visibility {
            item.visibility = Visibility::from_str(visibility)?;
        }
        if let Some(locked) = self.locked {
            item.locked = locked;
        }
        if let Some(style) = &self.style {
            item.set_style(style);
        }
        if !self.tags.is_empty() {
            item.tags = self.tags.clone();
        }
        Ok(())
    }
}

pub fn parse_kind(s: &str) -> Result<ContentType, String> {
    ContentType::from_str(s)
}
