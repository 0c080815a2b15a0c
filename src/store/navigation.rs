//! Navigation state: current folder and the server-confirmed breadcrumb trail.

use crate::remote::BreadcrumbEntry;
use crate::types::FolderId;

/// Where the user is.
///
/// `breadcrumbs` is only ever filled from a fetch result, and `path` and
/// `path_names` mirror it. All three are dropped as soon as the user moves to
/// another folder, so the trail never describes a folder other than the
/// current one. At the root it is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    current_folder_id: Option<FolderId>,
    breadcrumbs: Vec<BreadcrumbEntry>,
    path: Vec<FolderId>,
    path_names: Vec<String>,
}

/// Where a breadcrumb index leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreadcrumbTarget {
    Root,
    Folder(FolderId),
}

impl BreadcrumbTarget {
    pub fn into_folder_id(self) -> Option<FolderId> {
        match self {
            BreadcrumbTarget::Root => None,
            BreadcrumbTarget::Folder(id) => Some(id),
        }
    }
}

impl NavigationState {
    pub fn current_folder_id(&self) -> Option<&FolderId> {
        self.current_folder_id.as_ref()
    }

    pub fn is_at_root(&self) -> bool {
        self.current_folder_id.is_none()
    }

    pub fn breadcrumbs(&self) -> &[BreadcrumbEntry] {
        &self.breadcrumbs
    }

    pub fn path(&self) -> &[FolderId] {
        &self.path
    }

    pub fn path_names(&self) -> &[String] {
        &self.path_names
    }

    /// Move to `folder_id`. Moving to a different folder empties the trail
    /// until the fetch for that folder confirms a new one; reloading the
    /// current folder keeps it.
    pub(crate) fn set_current(&mut self, folder_id: Option<FolderId>) {
        if self.current_folder_id != folder_id {
            self.reset_trail();
        }
        self.current_folder_id = folder_id;
    }

    /// Replace the trail with a server-confirmed one.
    pub(crate) fn confirm_trail(&mut self, trail: Vec<BreadcrumbEntry>) {
        self.path = trail.iter().map(|b| b.id.clone()).collect();
        self.path_names = trail.iter().map(|b| b.name.clone()).collect();
        self.breadcrumbs = trail;
    }

    pub(crate) fn reset_trail(&mut self) {
        self.breadcrumbs.clear();
        self.path.clear();
        self.path_names.clear();
    }

    /// Resolve a breadcrumb index: `-1` is the root, `0..len` is a trail entry,
    /// anything else resolves to nothing.
    pub fn resolve_breadcrumb(&self, index: isize) -> Option<BreadcrumbTarget> {
        if index == -1 {
            return Some(BreadcrumbTarget::Root);
        }
        let index = usize::try_from(index).ok()?;
        self.breadcrumbs
            .get(index)
            .map(|b| BreadcrumbTarget::Folder(b.id.clone()))
    }

    /// Target one level up from the current folder, from the confirmed trail.
    pub fn parent_target(&self) -> Option<BreadcrumbTarget> {
        match self.breadcrumbs.len() {
            0 if self.is_at_root() => None,
            0 | 1 => Some(BreadcrumbTarget::Root),
            n => self.resolve_breadcrumb(n as isize - 2),
        }
    }
}
