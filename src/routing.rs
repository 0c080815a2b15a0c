//! Mapping between presentation-layer routes and folder ids.

use crate::types::FolderId;
use regex::Regex;
use std::sync::OnceLock;
use tracing::error;

/// Route prefix the file manager is mounted under.
pub const ROUTE_PREFIX: &str = "/file-manager";

const FOLDER_ID_PATTERN: &str =
    r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";

/// Compiled folder id pattern; `None` only if the constant above is broken,
/// which the tests rule out.
fn folder_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| match Regex::new(FOLDER_ID_PATTERN) {
            Ok(regex) => Some(regex),
            Err(e) => {
                error!(error = %e, "Folder id pattern failed to compile");
                None
            }
        })
        .as_ref()
}

/// Whether `segment` looks like a folder id.
pub fn is_folder_id(segment: &str) -> bool {
    folder_id_pattern().is_some_and(|pattern| pattern.is_match(segment))
}

/// Target folder of a route: its last segment when that is a folder id,
/// otherwise the root.
pub fn folder_id_from_segments<S: AsRef<str>>(segments: &[S]) -> Option<FolderId> {
    let last = segments.last()?.as_ref();
    is_folder_id(last).then(|| last.to_string())
}

/// Split a route such as `/file-manager/<id>/<id>` into its segments after the
/// prefix. Empty segments are dropped.
pub fn segments_of(route: &str) -> Vec<&str> {
    let rest = route.strip_prefix(ROUTE_PREFIX).unwrap_or(route);
    rest.split('/').filter(|s| !s.is_empty()).collect()
}

/// Route that shows the folder at the end of `path`.
pub fn route_for(path: &[FolderId]) -> String {
    let mut route = String::from(ROUTE_PREFIX);
    for id in path {
        route.push('/');
        route.push_str(id);
    }
    route
}
