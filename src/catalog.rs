//! Built-in seed catalog.
//!
//! The default catalog is the ground truth when neither the remote backend
//! nor the local mirror has richer data. Ids are fixed strings so merging is
//! deterministic across processes and installs.

use crate::types::{ContentItem, ContentType, Lesson, Level, Module, Visibility};

/// Bump whenever the seed content changes.
pub const CATALOG_VERSION: u32 = 4;

const SEED_STAMP: &str = "2026-06-01T00:00:00+00:00";

fn seed(
    id: &str,
    kind: ContentType,
    title: &str,
    description: &str,
    category: &str,
    level: Option<Level>,
    duration: &str,
    visibility: Visibility,
    locked: bool,
) -> ContentItem {
    let mut item = ContentItem::new(id.to_string(), kind, title.to_string());
    item.description = description.to_string();
    item.category = category.to_string();
    item.level = level;
    item.duration = duration.to_string();
    item.visibility = visibility;
    item.locked = locked;
    item.created_at = SEED_STAMP.to_string();
    item.updated_at = SEED_STAMP.to_string();
    item
}

fn seed_module(id: &str, title: &str, lessons: Vec<Lesson>) -> Module {
    let mut module = Module::new(id.to_string(), title.to_string());
    module.lessons = lessons;
    module
}

fn seed_lesson(id: &str, title: &str, duration: &str) -> Lesson {
    let mut lesson = Lesson::new(id.to_string(), title.to_string());
    lesson.duration = Some(duration.to_string());
    lesson
}

/// The 11 seed items, spanning every content type.
pub fn default_catalog() -> Vec<ContentItem> {
    let mut items = vec![
        seed(
            "course_network_fundamentals",
            ContentType::Course,
            "Network Fundamentals",
            "Packets, protocols, and the layers underneath every attack and defense.",
            "Networking",
            Some(Level::Beginner),
            "6 hours",
            Visibility::Public,
            false,
        ),
        seed(
            "course_web_application_security",
            ContentType::Course,
            "Web Application Security",
            "Injection, broken auth, and the rest of the ways web apps fall over.",
            "Web Security",
            Some(Level::Intermediate),
            "8 hours",
            Visibility::Public,
            false,
        ),
        seed(
            "course_linux_essentials",
            ContentType::Course,
            "Linux Command Line Essentials",
            "The shell skills every analyst leans on daily.",
            "Foundations",
            Some(Level::Beginner),
            "4 hours",
            Visibility::Public,
            false,
        ),
        seed(
            "course_red_team_operations",
            ContentType::Course,
            "Red Team Operations",
            "Internal tradecraft track for vetted operators.",
            "Offensive Security",
            Some(Level::Advanced),
            "12 hours",
            Visibility::Private,
            false,
        ),
        seed(
            "lab_sql_injection_playground",
            ContentType::Lab,
            "SQL Injection Playground",
            "A deliberately vulnerable storefront to practice UNION and blind techniques.",
            "Web Security",
            Some(Level::Intermediate),
            "90 minutes",
            Visibility::Public,
            false,
        ),
        seed(
            "lab_buffer_overflow_basics",
            ContentType::Lab,
            "Buffer Overflow Basics",
            "Smash a stack in a controlled harness, then fix it.",
            "Binary Exploitation",
            Some(Level::Advanced),
            "2 hours",
            Visibility::Public,
            true,
        ),
        seed(
            "note_owasp_top_10",
            ContentType::Note,
            "OWASP Top 10 Field Notes",
            "Condensed notes on each category with real-world report snippets.",
            "Web Security",
            None,
            "30 minutes",
            Visibility::Public,
            false,
        ),
        seed(
            "note_crypto_cheat_sheet",
            ContentType::Note,
            "Cryptography Cheat Sheet",
            "Symmetric vs asymmetric, hashing, and where each belongs.",
            "Cryptography",
            None,
            "20 minutes",
            Visibility::Public,
            false,
        ),
        seed(
            "challenge_packet_forensics",
            ContentType::Challenge,
            "Packet Capture Forensics",
            "Find the exfiltration channel hidden in a 40MB pcap.",
            "Forensics",
            Some(Level::Intermediate),
            "self-paced",
            Visibility::Public,
            false,
        ),
        seed(
            "challenge_reversing_warmup",
            ContentType::Challenge,
            "Reverse Engineering Warm-Up",
            "Three small binaries, three flags.",
            "Reverse Engineering",
            Some(Level::Beginner),
            "self-paced",
            Visibility::ComingSoon,
            false,
        ),
        seed(
            "roadmap_security_analyst",
            ContentType::Roadmap,
            "Security Analyst Roadmap",
            "From zero to SOC: the order to learn things in and why.",
            "Careers",
            None,
            "reference",
            Visibility::Public,
            false,
        ),
    ];

    // Network Fundamentals ships with real structure so a fresh install has
    // something to open.
    items[0].modules = vec![
        seed_module(
            "mod_netfun_layers",
            "Layers and Addressing",
            vec![
                seed_lesson("les_netfun_osi", "The OSI Model in Practice", "25 min"),
                seed_lesson("les_netfun_ip", "IP Addressing and Subnets", "35 min"),
            ],
        ),
        seed_module(
            "mod_netfun_traffic",
            "Reading Traffic",
            vec![
                seed_lesson("les_netfun_tcpdump", "First Steps with tcpdump", "30 min"),
                seed_lesson("les_netfun_wireshark", "Wireshark Essentials", "40 min"),
            ],
        ),
    ];
    items[0].tags = vec!["networking".to_string(), "blue-team".to_string()];

    for item in &mut items {
        item.normalize();
    }
    items
}
