//! Contributor Models (author, compiler, translator, illustrator, editor)
//!
//! All five roles share one document shape. The role is a zero-sized marker
//! type so each role keeps its own collection and its own list on [`Book`].

use std::fmt::Debug;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::Book;

/// A contributor role: where its documents live and which list of a book
/// points back at it.
pub trait ContributorRole: Debug + Clone + Send + Sync + 'static {
    /// Storage collection name
    const COLLECTION: &'static str;
    /// Human-readable name used in messages
    const LABEL: &'static str;

    fn book_refs(book: &Book) -> &Vec<String>;
    fn book_refs_mut(book: &mut Book) -> &mut Vec<String>;
}

macro_rules! contributor_role {
    ($marker:ident, $alias:ident, $collection:literal, $label:literal, $field:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $marker;

        impl ContributorRole for $marker {
            const COLLECTION: &'static str = $collection;
            const LABEL: &'static str = $label;

            fn book_refs(book: &Book) -> &Vec<String> {
                &book.$field
            }

            fn book_refs_mut(book: &mut Book) -> &mut Vec<String> {
                &mut book.$field
            }
        }

        pub type $alias = Contributor<$marker>;
    };
}

contributor_role!(AuthorRole, Author, "author", "Author", authors);
contributor_role!(CompilerRole, Compiler, "compiler", "Compiler", compilers);
contributor_role!(TranslatorRole, Translator, "translator", "Translator", translators);
contributor_role!(IllustratorRole, Illustrator, "illustrator", "Illustrator", illustrators);
contributor_role!(EditorRole, Editor, "editor", "Editor", editors);

/// Contributor entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct Contributor<R: ContributorRole> {
    pub id: String,
    /// Unique among active contributors of the same role
    pub full_name: String,
    /// Back-references to books listing this contributor
    #[serde(default)]
    pub books: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
    #[serde(skip)]
    pub role: PhantomData<R>,
}

/// Create contributor payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorCreate {
    pub full_name: String,
}

/// Update contributor payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorUpdate {
    pub full_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_marker_is_not_serialized() {
        let author = Author {
            id: "a1".to_string(),
            full_name: "John Smith".to_string(),
            books: vec![],
            created_at: 1,
            updated_at: 1,
            deleted_at: None,
            role: PhantomData,
        };
        let json = serde_json::to_value(&author).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "a1",
                "fullName": "John Smith",
                "books": [],
                "createdAt": 1,
                "updatedAt": 1
            })
        );
        let back: Translator = serde_json::from_value(json).unwrap();
        assert_eq!(back.full_name, "John Smith");
    }

    #[test]
    fn test_roles_point_at_their_own_book_list() {
        let mut book = Book::new("b1".to_string(), "p1".to_string());
        AuthorRole::book_refs_mut(&mut book).push("a1".to_string());
        EditorRole::book_refs_mut(&mut book).push("e1".to_string());
        assert_eq!(book.authors, vec!["a1"]);
        assert_eq!(book.editors, vec!["e1"]);
        assert!(TranslatorRole::book_refs(&book).is_empty());
        assert_eq!(IllustratorRole::COLLECTION, "illustrator");
    }
}
