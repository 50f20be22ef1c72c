//! Visibility and lock gating.
//!
//! Visibility controls whether an item appears to exist at all; `locked`
//! controls whether a discoverable item's payload may be opened. The two are
//! orthogonal: a public, locked item is a valid "coming later" teaser,
//! distinct from a private item that non-admins must not learn exists.

use crate::types::{ContentItem, Lesson, Role, Visibility};

/// Presentation state for a resolved `(item, role)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    NotFound,
    /// Private item, non-admin caller. Rendered identically to `NotFound`
    /// so existence is not leaked.
    ForbiddenPrivate,
    /// Discoverable but withheld: `coming_soon`, or item-level lock.
    Locked,
    Open,
}

/// Evaluate the gate. The order is load-bearing: privacy is checked before
/// lock status, so a private locked item reads as not-found to a non-admin.
pub fn evaluate(item: Option<&ContentItem>, role: Role) -> Access {
    let Some(item) = item else {
        return Access::NotFound;
    };
    if item.visibility == Visibility::Private && !role.is_admin() {
        return Access::ForbiddenPrivate;
    }
    if (item.visibility == Visibility::ComingSoon || item.locked) && !role.is_admin() {
        return Access::Locked;
    }
    Access::Open
}

/// Per-lesson gate, applied within an `Open` item. Admins bypass both the
/// item lock and the lesson lock.
pub fn lesson_openable(item: &ContentItem, lesson: &Lesson, role: Role) -> bool {
    role.is_admin() || (!item.locked && !lesson.locked)
}

/// Whether the item should appear in listings for this caller at all.
pub fn discoverable(item: &ContentItem, role: Role) -> bool {
    evaluate(Some(item), role) != Access::ForbiddenPrivate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentType;

    fn item(visibility: Visibility, locked: bool) -> ContentItem {
        let mut item = ContentItem::new(
            "course_g".to_string(),
            ContentType::Course,
            "Gated".to_string(),
        );
        item.visibility = visibility;
        item.locked = locked;
        item
    }

    #[test]
    fn missing_item_is_not_found() {
        assert_eq!(evaluate(None, Role::Admin), Access::NotFound);
        assert_eq!(evaluate(None, Role::User), Access::NotFound);
    }

    #[test]
    fn privacy_is_checked_before_lock() {
        let gated = item(Visibility::Private, true);
        assert_eq!(evaluate(Some(&gated), Role::User), Access::ForbiddenPrivate);
    }

    #[test]
    fn coming_soon_and_locked_both_gate_non_admins() {
        let soon = item(Visibility::ComingSoon, false);
        assert_eq!(evaluate(Some(&soon), Role::User), Access::Locked);

        let locked = item(Visibility::Public, true);
        assert_eq!(evaluate(Some(&locked), Role::User), Access::Locked);
    }

    #[test]
    fn admin_bypasses_every_gate() {
        for (visibility, locked) in [
            (Visibility::Private, true),
            (Visibility::ComingSoon, false),
            (Visibility::Public, true),
        ] {
            assert_eq!(evaluate(Some(&item(visibility, locked)), Role::Admin), Access::Open);
        }
    }

    #[test]
    fn public_unlocked_is_open_for_everyone() {
        let open = item(Visibility::Public, false);
        assert_eq!(evaluate(Some(&open), Role::User), Access::Open);
    }

    #[test]
    fn lesson_gate_requires_both_locks_clear() {
        let mut parent = item(Visibility::Public, false);
        let mut lesson = Lesson::new("les_g".to_string(), "Gated Lesson".to_string());

        assert!(lesson_openable(&parent, &lesson, Role::User));

        lesson.locked = true;
        assert!(!lesson_openable(&parent, &lesson, Role::User));
        assert!(lesson_openable(&parent, &lesson, Role::Admin));

        lesson.locked = false;
        parent.locked = true;
        assert!(!lesson_openable(&parent, &lesson, Role::User));
        assert!(lesson_openable(&parent, &lesson, Role::Admin));
    }
}
