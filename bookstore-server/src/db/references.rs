//! Bidirectional reference maintenance
//!
//! Many relations are stored on both endpoints: a book lists its authors and
//! every author lists its books. The owning side replaces its list wholesale
//! and [`sync_many`] / [`sync_single`] bring the inverse side in line.
//!
//! All helpers run inside the caller's [`WriteScope`], so a failed check
//! leaves nothing behind once the scope is dropped.

use shared::error::AppResult;
use shared::util::now_millis;

use super::document::Document;
use super::store::{Scope, WriteScope};

/// Membership change between two id lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefDelta {
    /// In `new` but not in `old`, in `new` order
    pub added: Vec<String>,
    /// In `old` but not in `new`, in `old` order
    pub removed: Vec<String>,
}

impl RefDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Remove duplicates, keeping first occurrences
pub fn dedup(ids: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(id.clone());
        }
    }
    out
}

pub fn delta(old: &[String], new: &[String]) -> RefDelta {
    let added = dedup(new)
        .into_iter()
        .filter(|id| !old.contains(id))
        .collect();
    let removed = dedup(old)
        .into_iter()
        .filter(|id| !new.contains(id))
        .collect();
    RefDelta { added, removed }
}

/// Push `id` unless present. Returns whether the list changed.
pub fn link(list: &mut Vec<String>, id: &str) -> bool {
    if list.iter().any(|x| x == id) {
        return false;
    }
    list.push(id.to_string());
    true
}

/// Drop every occurrence of `id`. Returns whether the list changed.
pub fn unlink(list: &mut Vec<String>, id: &str) -> bool {
    let before = list.len();
    list.retain(|x| x != id);
    list.len() != before
}

/// Resolve `ids` to active documents, in input order.
///
/// Fails with NotFound naming the first id that is missing or tombstoned.
pub fn require_all<C: Document>(scope: &impl Scope, ids: &[String]) -> AppResult<Vec<C>> {
    ids.iter().map(|id| scope.require::<C>(id)).collect()
}

/// Apply the inverse side of a list-valued relation.
///
/// Every id in `new` must be an active `C`; then `parent_id` is added to
/// `back(child)` for added children and removed for removed ones. Returns
/// the de-duplicated new membership to store on the parent.
pub fn sync_many<C: Document>(
    scope: &mut WriteScope,
    parent_id: &str,
    old: &[String],
    new: &[String],
    back: fn(&mut C) -> &mut Vec<String>,
) -> AppResult<Vec<String>> {
    let new = dedup(new);
    require_all::<C>(&*scope, &new)?;

    let RefDelta { added, removed } = delta(old, &new);
    let now = now_millis();

    for id in &added {
        let mut child = scope.require::<C>(id)?;
        if link(back(&mut child), parent_id) {
            child.touch(now);
            scope.save(&child)?;
        }
    }
    for id in &removed {
        // tombstoned children still get cleaned
        if let Some(mut child) = scope.find_any::<C>(id)?
            && unlink(back(&mut child), parent_id)
        {
            child.touch(now);
            scope.save(&child)?;
        }
    }

    Ok(new)
}

/// [`sync_many`] for a single-valued reference held by the parent.
pub fn sync_single<C: Document>(
    scope: &mut WriteScope,
    parent_id: &str,
    old: Option<&str>,
    new: Option<&str>,
    back: fn(&mut C) -> &mut Vec<String>,
) -> AppResult<Option<String>> {
    let old: Vec<String> = old.into_iter().map(str::to_string).collect();
    let new: Vec<String> = new.into_iter().map(str::to_string).collect();
    let kept = sync_many::<C>(scope, parent_id, &old, &new, back)?;
    Ok(kept.into_iter().next())
}

/// Unlink `parent_id` from every child listed in `ids`.
///
/// Used by delete cascades; missing children are skipped.
pub fn unlink_all<C: Document>(
    scope: &mut WriteScope,
    parent_id: &str,
    ids: &[String],
    back: fn(&mut C) -> &mut Vec<String>,
) -> AppResult<()> {
    let now = now_millis();
    for id in dedup(ids) {
        if let Some(mut child) = scope.find_any::<C>(&id)?
            && unlink(back(&mut child), parent_id)
        {
            child.touch(now);
            scope.save(&child)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DocumentStore;
    use shared::error::ErrorCode;
    use shared::models::{Author, Book};
    use std::marker::PhantomData;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn author(id: &str) -> Author {
        Author {
            id: id.to_string(),
            full_name: format!("Author {id}"),
            books: vec![],
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
            role: PhantomData,
        }
    }

    fn author_books(a: &mut Author) -> &mut Vec<String> {
        &mut a.books
    }

    #[test]
    fn test_delta_keeps_added_and_removed_distinct() {
        let d = delta(&ids(&["a", "b", "c"]), &ids(&["c", "d", "d", "e"]));
        assert_eq!(d.added, ids(&["d", "e"]));
        assert_eq!(d.removed, ids(&["a", "b"]));
        assert!(delta(&ids(&["a"]), &ids(&["a"])).is_empty());
    }

    #[test]
    fn test_link_is_idempotent() {
        let mut list = ids(&["x"]);
        assert!(!link(&mut list, "x"));
        assert!(link(&mut list, "y"));
        assert_eq!(list, ids(&["x", "y"]));
        assert!(unlink(&mut list, "x"));
        assert!(!unlink(&mut list, "x"));
    }

    #[test]
    fn test_sync_many_updates_inverse_side() {
        let store = DocumentStore::open_in_memory().unwrap();
        let mut scope = store.write().unwrap();
        for id in ["a1", "a2", "a3"] {
            scope.save(&author(id)).unwrap();
        }
        let book = Book::new("b1".to_string(), "p1".to_string());

        let kept = sync_many::<Author>(&mut scope, &book.id, &[], &ids(&["a1", "a2", "a1"]), author_books)
            .unwrap();
        assert_eq!(kept, ids(&["a1", "a2"]));

        let kept = sync_many::<Author>(&mut scope, &book.id, &kept, &ids(&["a2", "a3"]), author_books)
            .unwrap();
        assert_eq!(kept, ids(&["a2", "a3"]));
        scope.commit().unwrap();

        let read = store.read().unwrap();
        assert!(read.require::<Author>("a1").unwrap().books.is_empty());
        assert_eq!(read.require::<Author>("a2").unwrap().books, ids(&["b1"]));
        assert_eq!(read.require::<Author>("a3").unwrap().books, ids(&["b1"]));
    }

    #[test]
    fn test_sync_many_reports_first_missing_id_and_writes_nothing() {
        let store = DocumentStore::open_in_memory().unwrap();
        let mut scope = store.write().unwrap();
        scope.save(&author("a1")).unwrap();
        let mut gone = author("a2");
        gone.deleted_at = Some(1);
        scope.save(&gone).unwrap();
        scope.commit().unwrap();

        let mut scope = store.write().unwrap();
        let err = sync_many::<Author>(
            &mut scope,
            "b1",
            &[],
            &ids(&["a1", "a2", "zz"]),
            author_books,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.details.unwrap().get("id").unwrap(), "a2");
        drop(scope);

        let read = store.read().unwrap();
        assert!(read.require::<Author>("a1").unwrap().books.is_empty());
    }

    #[test]
    fn test_sync_single_and_unlink_all() {
        let store = DocumentStore::open_in_memory().unwrap();
        let mut scope = store.write().unwrap();
        scope.save(&author("a1")).unwrap();
        scope.save(&author("a2")).unwrap();

        let kept = sync_single::<Author>(&mut scope, "b1", None, Some("a1"), author_books).unwrap();
        assert_eq!(kept.as_deref(), Some("a1"));
        let kept = sync_single::<Author>(&mut scope, "b1", Some("a1"), Some("a2"), author_books)
            .unwrap();
        assert_eq!(kept.as_deref(), Some("a2"));
        assert!(scope.require::<Author>("a1").unwrap().books.is_empty());

        unlink_all::<Author>(&mut scope, "b1", &ids(&["a2", "missing"]), author_books).unwrap();
        assert!(scope.require::<Author>("a2").unwrap().books.is_empty());
    }
}
