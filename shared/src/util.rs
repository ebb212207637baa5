use serde::{Deserialize, Deserializer};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a fresh document id (UUID v4, hyphenated)
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Deserialize a field that distinguishes "absent" from "explicit null".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]` on an
/// `Option<Option<T>>` field: absent → `None`, `null` → `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Lower-case, ASCII-alphanumeric slug joined by dashes.
///
/// Non-ASCII letters are kept as-is so Cyrillic titles still produce a key.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        parent: Option<Option<String>>,
    }

    #[test]
    fn test_double_option() {
        let p: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(p.parent, None);
        let p: Patch = serde_json::from_str(r#"{"parent":null}"#).unwrap();
        assert_eq!(p.parent, Some(None));
        let p: Patch = serde_json::from_str(r#"{"parent":"s1"}"#).unwrap();
        assert_eq!(p.parent, Some(Some("s1".to_string())));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  The Lord of the Rings "), "the-lord-of-the-rings");
        assert_eq!(slugify("Catan: 5-6 Players!"), "catan-5-6-players");
        assert_eq!(slugify("Кобзар"), "кобзар");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_new_id_is_uuid() {
        let id = new_id();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert_ne!(id, new_id());
    }
}
