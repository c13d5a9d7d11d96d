//! Rendered records ready for the content store.

/// The persisted artifact for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// File name; also the deduplication key
    pub identifier: String,

    /// Rendered front-matter document
    pub body: String,

    /// Item title, kept for commit messages and log context
    pub title: String,
}

impl Record {
    /// Path of this record below the given content root.
    pub fn path(&self, content_root: &str) -> String {
        let root = content_root.trim_matches('/');
        if root.is_empty() {
            self.identifier.clone()
        } else {
            format!("{}/{}", root, self.identifier)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record {
            identifier: "hello-2019-04-23T12:16:15+07:00.md".into(),
            body: String::new(),
            title: "Hello".into(),
        }
    }

    #[test]
    fn test_path_joins_root() {
        assert_eq!(
            record().path("content/links/"),
            "content/links/hello-2019-04-23T12:16:15+07:00.md"
        );
    }

    #[test]
    fn test_path_without_root() {
        assert_eq!(record().path(""), "hello-2019-04-23T12:16:15+07:00.md");
    }
}
