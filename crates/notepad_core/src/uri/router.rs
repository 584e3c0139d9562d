//! URI Router.
//!
//! # Responsibility
//! - Own the fixed pattern table for one authority.
//! - Turn a raw identifier into a typed `UriMatch` or `UnknownResource`.

use super::ResourceUri;
use crate::contract::{PATH_LIVE_FOLDER_NOTES, PATH_NOTES};
use crate::error::{StoreError, StoreResult};

/// Routing outcome for an identifier the store serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriMatch {
    /// `notes`
    Notes,
    /// `notes/<integer>`
    NoteId(i64),
    /// `live_folders/notes`
    LiveFolderNotes,
}

impl UriMatch {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::NoteId(_) => "note_id",
            Self::LiveFolderNotes => "live_folder_notes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// Matches an all-digit segment that parses as `i64`.
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Notes,
    NoteId,
    LiveFolderNotes,
}

#[derive(Debug, Clone)]
struct Pattern {
    segments: Vec<Segment>,
    route: Route,
}

/// Pattern table for one authority, built once and shared read-only.
#[derive(Debug, Clone)]
pub struct UriRouter {
    authority: String,
    patterns: Vec<Pattern>,
}

impl UriRouter {
    /// Registers the collection, item and live folder patterns, in that order.
    pub fn new(authority: impl Into<String>) -> Self {
        let mut router = Self {
            authority: authority.into(),
            patterns: Vec::new(),
        };
        router.add(PATH_NOTES, Route::Notes);
        router.add(&format!("{PATH_NOTES}/#"), Route::NoteId);
        router.add(PATH_LIVE_FOLDER_NOTES, Route::LiveFolderNotes);
        router
    }

    fn add(&mut self, path: &str, route: Route) {
        let segments = path
            .split('/')
            .map(|segment| match segment {
                "#" => Segment::Number,
                literal => Segment::Literal(literal.to_string()),
            })
            .collect();
        self.patterns.push(Pattern { segments, route });
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Classifies a parsed identifier; `None` when no pattern matches.
    pub fn match_uri(&self, uri: &ResourceUri) -> Option<UriMatch> {
        if uri.authority() != self.authority {
            return None;
        }
        self.patterns
            .iter()
            .find_map(|pattern| match_pattern(pattern, uri.segments()))
    }

    /// Parses and classifies a raw identifier.
    pub fn route(&self, raw: &str) -> StoreResult<(ResourceUri, UriMatch)> {
        ResourceUri::parse(raw)
            .and_then(|uri| self.match_uri(&uri).map(|matched| (uri, matched)))
            .ok_or_else(|| StoreError::UnknownResource(raw.to_string()))
    }

    /// `content://<authority>/notes`
    pub fn notes_uri(&self) -> ResourceUri {
        ResourceUri::new(&self.authority, PATH_NOTES)
    }

    /// `content://<authority>/notes/<id>`
    pub fn note_uri(&self, id: i64) -> ResourceUri {
        self.notes_uri().with_appended(id)
    }

    /// `content://<authority>/live_folders/notes`
    pub fn live_folder_uri(&self) -> ResourceUri {
        ResourceUri::new(&self.authority, PATH_LIVE_FOLDER_NOTES)
    }

    /// Standard spelling of a matched identifier, e.g. `notes/007` becomes
    /// `notes/7`.
    pub fn canonical_uri(&self, matched: UriMatch) -> ResourceUri {
        match matched {
            UriMatch::Notes => self.notes_uri(),
            UriMatch::NoteId(id) => self.note_uri(id),
            UriMatch::LiveFolderNotes => self.live_folder_uri(),
        }
    }
}

fn match_pattern(pattern: &Pattern, segments: &[String]) -> Option<UriMatch> {
    if pattern.segments.len() != segments.len() {
        return None;
    }
    let mut captured = None;
    for (expected, actual) in pattern.segments.iter().zip(segments) {
        match expected {
            Segment::Literal(literal) if literal == actual => {}
            Segment::Literal(_) => return None,
            Segment::Number => captured = Some(parse_id(actual)?),
        }
    }
    Some(match pattern.route {
        Route::Notes => UriMatch::Notes,
        Route::NoteId => UriMatch::NoteId(captured?),
        Route::LiveFolderNotes => UriMatch::LiveFolderNotes,
    })
}

fn parse_id(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
