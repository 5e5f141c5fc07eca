//! Page boundary cursors.
//!
//! A cursor is handed back by the client verbatim; the server keeps no paging
//! state. Ordinal cursors address identity-ordered tables, composite cursors
//! address stores sorted by `(primary value, id)`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which cursor representation a table accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    Ordinal,
    Composite,
}

/// Boundary between two consecutive pages.
///
/// Ordering of composite cursors is lexicographic on `(primary, id)`, which
/// matches the two-part sort the search index applies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cursor {
    Ordinal(i64),
    Composite { primary: String, id: String },
}

impl Cursor {
    /// Parse the raw `id` (and optional `secondary` primary-sort value) for `kind`.
    ///
    /// Returns `Ok(None)` when no cursor was supplied at all.
    pub fn parse(
        kind: CursorKind,
        id: Option<&str>,
        secondary: Option<&str>,
    ) -> Result<Option<Self>> {
        let id = id.map(str::trim).filter(|s| !s.is_empty());
        let secondary = secondary.map(str::trim).filter(|s| !s.is_empty());

        match kind {
            CursorKind::Ordinal => {
                let Some(id) = id else {
                    return Ok(None);
                };
                id.parse::<i64>()
                    .map(|v| Some(Self::Ordinal(v)))
                    .map_err(|_| Error::validation(format!("cursor id '{id}' is not an integer")))
            }
            CursorKind::Composite => match (secondary, id) {
                (None, None) => Ok(None),
                (Some(primary), Some(id)) => Ok(Some(Self::Composite {
                    primary: primary.to_string(),
                    id: id.to_string(),
                })),
                (None, Some(_)) => Err(Error::validation(
                    "cursor id supplied without its sort value",
                )),
                (Some(_), None) => Err(Error::validation(
                    "cursor sort value supplied without its id",
                )),
            },
        }
    }

    /// Identity of the boundary row, comparable with `PageRow::identity`.
    pub fn id(&self) -> String {
        match self {
            Self::Ordinal(id) => id.to_string(),
            Self::Composite { id, .. } => id.clone(),
        }
    }

    pub fn as_ordinal(&self) -> Option<i64> {
        match self {
            Self::Ordinal(id) => Some(*id),
            Self::Composite { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_cursor_parses_to_none() {
        assert_eq!(Cursor::parse(CursorKind::Ordinal, None, None).unwrap(), None);
        assert_eq!(
            Cursor::parse(CursorKind::Composite, Some("  "), Some("")).unwrap(),
            None
        );
    }

    #[test]
    fn ordinal_cursor_requires_integer() {
        assert_eq!(
            Cursor::parse(CursorKind::Ordinal, Some("42"), None).unwrap(),
            Some(Cursor::Ordinal(42))
        );
        let err = Cursor::parse(CursorKind::Ordinal, Some("4x"), None).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn composite_cursor_requires_both_parts() {
        let cursor = Cursor::parse(
            CursorKind::Composite,
            Some("doc-7"),
            Some("2024-05-01T10:00:00Z"),
        )
        .unwrap();
        assert_eq!(
            cursor,
            Some(Cursor::Composite {
                primary: "2024-05-01T10:00:00Z".into(),
                id: "doc-7".into()
            })
        );

        assert!(Cursor::parse(CursorKind::Composite, Some("doc-7"), None)
            .unwrap_err()
            .is_validation());
        assert!(
            Cursor::parse(CursorKind::Composite, None, Some("2024-05-01T10:00:00Z"))
                .unwrap_err()
                .is_validation()
        );
    }

    #[test]
    fn composite_cursors_order_lexicographically() {
        let a = Cursor::Composite {
            primary: "2024-05-01T10:00:00Z".into(),
            id: "b".into(),
        };
        let b = Cursor::Composite {
            primary: "2024-05-01T10:00:00Z".into(),
            id: "c".into(),
        };
        let c = Cursor::Composite {
            primary: "2024-05-02T00:00:00Z".into(),
            id: "a".into(),
        };
        assert!(a < b);
        assert!(b < c);
        assert_eq!(c.id(), "a");
    }
}
