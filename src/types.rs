use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ids::slugify;

/// Tag prefix older catalog blobs used to smuggle the presentation style
/// through the generic tag list. Lifted into [`ContentItem::style`] on
/// normalization and never written back.
pub const STYLE_TAG_PREFIX: &str = "style:";

/// Sentinel style value meaning "no explicit style".
pub const DEFAULT_STYLE: &str = "default";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Course,
    Lab,
    Note,
    Roadmap,
    Challenge,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Course => "course",
            ContentType::Lab => "lab",
            ContentType::Note => "note",
            ContentType::Roadmap => "roadmap",
            ContentType::Challenge => "challenge",
        }
    }

    pub fn all() -> [ContentType; 5] {
        [
            ContentType::Course,
            ContentType::Lab,
            ContentType::Note,
            ContentType::Roadmap,
            ContentType::Challenge,
        ]
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "course" => Ok(ContentType::Course),
            "lab" => Ok(ContentType::Lab),
            "note" => Ok(ContentType::Note),
            "roadmap" => Ok(ContentType::Roadmap),
            "challenge" => Ok(ContentType::Challenge),
            _ => Err(format!("Unknown content type: {s}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            _ => Err(format!("Unknown level: {s}")),
        }
    }
}

/// Discoverability of an item. Orthogonal to [`ContentItem::locked`], which
/// withholds the payload of an item that is allowed to be discovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
    ComingSoon,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::ComingSoon => "coming_soon",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            "coming_soon" => Ok(Visibility::ComingSoon),
            _ => Err(format!("Unknown visibility: {s}")),
        }
    }
}

/// Caller role as supplied by the identity collaborator. An absent session
/// is treated as `User`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Admin => "admin",
            Role::User => "user",
        })
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" | "" => Ok(Role::User),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// Remote phase outcome for a locally committed write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Synced,
    Failed,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Synced => "synced",
            SyncStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    /// 1-based position within the parent module; rewritten on every save.
    pub order: u32,
    pub duration: Option<String>,
    pub video_url: Option<String>,
    /// Newline-delimited plain-text paragraphs.
    pub notes_text: Option<String>,
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub locked: bool,
}

impl Lesson {
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            order: 0,
            duration: None,
            video_url: None,
            notes_text: None,
            pdf_url: None,
            locked: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub title: String,
    /// 1-based position within the parent item; rewritten on every save.
    pub order: u32,
    pub description: Option<String>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Module {
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            order: 0,
            description: None,
            lessons: Vec::new(),
        }
    }
}

/// Top-level catalog entry. Serializes with the camelCase field names the
/// mirror blob has always used (`thumbnailUrl`, `createdAt`, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: Option<Level>,
    pub duration: String,
    pub thumbnail_url: String,
    pub visibility: Visibility,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub modules: Vec<Module>,
    /// Presentation style. Older blobs carried this as a `style:<name>` tag;
    /// those are lifted here during normalization.
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ContentItem {
    pub fn new(id: String, kind: ContentType, title: String) -> Self {
        let slug = slugify(&title);
        Self {
            id,
            slug,
            kind,
            title,
            description: String::new(),
            category: String::new(),
            level: None,
            duration: String::new(),
            thumbnail_url: String::new(),
            visibility: Visibility::Public,
            locked: false,
            modules: Vec::new(),
            style: None,
            tags: Vec::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// Set the presentation style. The sentinel `default` (or empty) clears
    /// it. Any `style:` tag left over from older data is removed so the tag
    /// list never holds more than one style encoding.
    pub fn set_style(&mut self, style: &str) {
        self.tags.retain(|t| !t.starts_with(STYLE_TAG_PREFIX));
        let style = style.trim();
        if style.is_empty() || style == DEFAULT_STYLE {
            self.style = None;
        } else {
            self.style = Some(style.to_string());
        }
    }

    /// Move a legacy `style:<name>` tag out of the tag list into the
    /// first-class field. An explicit field value wins over a tag.
    fn lift_style_tag(&mut self) {
        let mut lifted: Option<String> = None;
        self.tags.retain(|t| match t.strip_prefix(STYLE_TAG_PREFIX) {
            Some(value) => {
                if lifted.is_none() {
                    lifted = Some(value.trim().to_string());
                }
                false
            }
            None => true,
        });
        if self.style.is_none() {
            if let Some(value) = lifted {
                if !value.is_empty() && value != DEFAULT_STYLE {
                    self.style = Some(value);
                }
            }
        }
    }

    /// Reassign `order` so modules and lessons are 1-based and contiguous,
    /// keeping the existing relative ordering.
    pub fn renumber(&mut self) {
        self.modules.sort_by_key(|m| m.order);
        for (i, module) in self.modules.iter_mut().enumerate() {
            module.order = (i + 1) as u32;
            module.lessons.sort_by_key(|l| l.order);
            for (j, lesson) in module.lessons.iter_mut().enumerate() {
                lesson.order = (j + 1) as u32;
            }
        }
    }

    /// Bring an item into canonical shape: defaulted slug, lifted style tag,
    /// contiguous ordering. Applied to everything entering the store, from
    /// any source.
    pub fn normalize(&mut self) {
        if self.slug.trim().is_empty() {
            self.slug = slugify(&self.title);
        }
        self.lift_style_tag();
        self.renumber();
    }

    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    pub fn find_lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.modules
            .iter()
            .flat_map(|m| m.lessons.iter())
            .find(|l| l.id == lesson_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: &str, order: u32) -> Lesson {
        let mut l = Lesson::new(id.to_string(), format!("Lesson {id}"));
        l.order = order;
        l
    }

    fn item_with_modules() -> ContentItem {
        let mut item = ContentItem::new(
            "course_t".to_string(),
            ContentType::Course,
            "Test Course".to_string(),
        );
        let mut m1 = Module::new("mod_a".to_string(), "Alpha".to_string());
        m1.order = 7;
        m1.lessons = vec![lesson("les_2", 9), lesson("les_1", 3)];
        let mut m2 = Module::new("mod_b".to_string(), "Bravo".to_string());
        m2.order = 2;
        item.modules = vec![m1, m2];
        item
    }

    #[test]
    fn renumber_makes_orders_contiguous() {
        let mut item = item_with_modules();
        item.renumber();
        assert_eq!(item.modules[0].id, "mod_b");
        assert_eq!(item.modules[0].order, 1);
        assert_eq!(item.modules[1].id, "mod_a");
        assert_eq!(item.modules[1].order, 2);
        let lessons = &item.modules[1].lessons;
        assert_eq!(lessons[0].id, "les_1");
        assert_eq!(lessons[0].order, 1);
        assert_eq!(lessons[1].id, "les_2");
        assert_eq!(lessons[1].order, 2);
    }

    #[test]
    fn style_setter_keeps_a_single_value() {
        let mut item = ContentItem::new(
            "note_t".to_string(),
            ContentType::Note,
            "Styles".to_string(),
        );
        item.set_style("terminal");
        item.set_style("neon");
        assert_eq!(item.style.as_deref(), Some("neon"));
        assert!(!item.tags.iter().any(|t| t.starts_with(STYLE_TAG_PREFIX)));

        item.set_style(DEFAULT_STYLE);
        assert_eq!(item.style, None);
    }

    #[test]
    fn legacy_style_tag_is_lifted_on_normalize() {
        let mut item = ContentItem::new(
            "note_t".to_string(),
            ContentType::Note,
            "Styles".to_string(),
        );
        item.tags = vec![
            "blue-team".to_string(),
            "style:matrix".to_string(),
            "style:ignored".to_string(),
        ];
        item.normalize();
        assert_eq!(item.style.as_deref(), Some("matrix"));
        assert_eq!(item.tags, vec!["blue-team".to_string()]);
    }

    #[test]
    fn normalize_defaults_missing_slug() {
        let mut item = ContentItem::new(
            "lab_t".to_string(),
            ContentType::Lab,
            "Packet Capture 101".to_string(),
        );
        item.slug = "  ".to_string();
        item.normalize();
        assert_eq!(item.slug, "packet-capture-101");
    }

    #[test]
    fn item_serializes_with_mirror_field_names() {
        let item = ContentItem::new(
            "course_t".to_string(),
            ContentType::Course,
            "Wire Shape".to_string(),
        );
        let value = serde_json::to_value(&item).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("type"));
        assert!(obj.contains_key("thumbnailUrl"));
        assert!(obj.contains_key("createdAt"));
        assert!(obj.contains_key("updatedAt"));
        assert_eq!(obj["type"], "course");
    }

    #[test]
    fn lesson_serializes_optional_payloads_as_null() {
        let l = Lesson::new("les_t".to_string(), "Nulls".to_string());
        let value = serde_json::to_value(&l).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj["videoUrl"].is_null());
        assert!(obj["notesText"].is_null());
        assert!(obj["pdfUrl"].is_null());
    }
}
