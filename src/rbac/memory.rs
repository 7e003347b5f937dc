/*!
 * In-Memory Item Store
 * Items, hierarchy and assignments published as immutable snapshots
 *
 * Reads load the current snapshot without locking. Writers are serialized by a
 * mutex and publish a modified clone (read-copy-update), so a write is visible
 * to every read that starts after the write returns.
 */

use super::document::PolicyDocument;
use super::item::{Assignment, ChildLink, Item, ItemType};
use super::store::{AssignmentStore, RbacStore};
use crate::core::{InlineString, Params, RbacResult, StoreError, Subject, SubjectId};
use ahash::{HashMap, HashSet};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// One immutable version of the store
#[derive(Debug, Clone)]
struct StoreState {
    items: Vec<Item>,
    index: HashMap<InlineString, usize>,
    children: HashMap<InlineString, Vec<InlineString>>,
    parents: HashMap<InlineString, Vec<InlineString>>,
    assignments: HashMap<SubjectId, Vec<Assignment>>,
    default_roles: Vec<InlineString>,
    /// Permission-typed items in registration order, rebuilt on every write
    permissions: Arc<[Item]>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::default(),
            children: HashMap::default(),
            parents: HashMap::default(),
            assignments: HashMap::default(),
            default_roles: Vec::new(),
            permissions: Arc::from(Vec::new()),
        }
    }
}

impl StoreState {
    fn refresh(&mut self) {
        self.index = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.name.clone(), i))
            .collect();
        self.permissions = self
            .items
            .iter()
            .filter(|item| item.is_permission())
            .cloned()
            .collect();
    }

    fn get(&self, name: &str) -> Option<&Item> {
        self.index.get(name).map(|&i| &self.items[i])
    }

    fn require(&self, name: &str) -> Result<&Item, StoreError> {
        self.get(name)
            .ok_or_else(|| StoreError::ItemNotFound(name.into()))
    }

    fn insert_item(&mut self, item: Item) -> Result<(), StoreError> {
        if self.index.contains_key(item.name()) {
            return Err(StoreError::DuplicateItem(item.name.clone()));
        }
        self.index.insert(item.name.clone(), self.items.len());
        self.items.push(item);
        Ok(())
    }

    fn delete_item(&mut self, name: &str) -> Result<Item, StoreError> {
        let pos = *self
            .index
            .get(name)
            .ok_or_else(|| StoreError::ItemNotFound(name.into()))?;
        let item = self.items.remove(pos);

        self.children.remove(name);
        self.parents.remove(name);
        for kids in self.children.values_mut() {
            kids.retain(|k| k.as_str() != name);
        }
        for ups in self.parents.values_mut() {
            ups.retain(|p| p.as_str() != name);
        }
        for list in self.assignments.values_mut() {
            list.retain(|a| a.item.as_str() != name);
        }
        self.assignments.retain(|_, list| !list.is_empty());

        self.refresh();
        Ok(item)
    }

    /// Whether `target` can be reached from `from` by following child links
    fn reaches(&self, from: &str, target: &str) -> bool {
        let mut visited: HashSet<&str> = HashSet::default();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(kids) = self.children.get(current) {
                stack.extend(kids.iter().map(InlineString::as_str));
            }
        }
        false
    }

    fn link(&mut self, parent: &str, child: &str) -> Result<(), StoreError> {
        let parent_item = self.require(parent)?;
        let child_item = self.require(child)?;

        let invalid = |reason: &str| StoreError::InvalidHierarchy {
            parent: parent.into(),
            child: child.into(),
            reason: reason.into(),
        };

        if parent_item.item_type == ItemType::Permission && child_item.item_type == ItemType::Role {
            return Err(invalid("a permission cannot contain a role"));
        }
        if self
            .children
            .get(parent)
            .is_some_and(|kids| kids.iter().any(|k| k.as_str() == child))
        {
            return Err(invalid("already a child"));
        }
        if parent == child || self.reaches(child, parent) {
            return Err(StoreError::HierarchyLoop {
                parent: parent.into(),
                child: child.into(),
            });
        }

        self.children
            .entry(parent.into())
            .or_default()
            .push(child.into());
        self.parents
            .entry(child.into())
            .or_default()
            .push(parent.into());
        Ok(())
    }

    fn unlink(&mut self, parent: &str, child: &str) -> bool {
        let removed = match self.children.get_mut(parent) {
            Some(kids) => {
                let before = kids.len();
                kids.retain(|k| k.as_str() != child);
                kids.len() != before
            }
            None => false,
        };
        if removed {
            if let Some(ups) = self.parents.get_mut(child) {
                ups.retain(|p| p.as_str() != parent);
            }
        }
        removed
    }

    fn add_assignment(&mut self, assignment: Assignment) -> Result<(), StoreError> {
        self.require(&assignment.item)?;
        let list = self
            .assignments
            .entry(assignment.subject.clone())
            .or_default();
        if list.iter().any(|a| a.item == assignment.item) {
            return Err(StoreError::DuplicateAssignment {
                subject: assignment.subject.as_str().into(),
                item: assignment.item.clone(),
            });
        }
        list.push(assignment);
        Ok(())
    }

    /// Remove `item` from `subject`, restricted to transient assignments if asked
    fn remove_assignment(&mut self, subject: &SubjectId, item: &str, transient_only: bool) -> bool {
        let Some(list) = self.assignments.get_mut(subject) else {
            return false;
        };
        let before = list.len();
        list.retain(|a| a.item.as_str() != item || (transient_only && !a.transient));
        let removed = list.len() != before;
        if list.is_empty() {
            self.assignments.remove(subject);
        }
        removed
    }

    fn find_assignment(&self, subject: &SubjectId, item: &str) -> Option<&Assignment> {
        self.assignments
            .get(subject)
            .and_then(|list| list.iter().find(|a| a.item.as_str() == item))
    }

    /// Walk from `name` up through its parents looking for something the
    /// subject holds directly or through a default role
    fn grants(&self, subject: &Subject, name: &str) -> bool {
        let assigned: &[Assignment] = subject
            .id()
            .and_then(|id| self.assignments.get(id))
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut visited: HashSet<&str> = HashSet::default();
        let mut stack = vec![name];
        while let Some(current) = stack.pop() {
            if !self.index.contains_key(current) || !visited.insert(current) {
                continue;
            }
            if assigned.iter().any(|a| a.item.as_str() == current)
                || self.default_roles.iter().any(|r| r.as_str() == current)
            {
                return true;
            }
            if let Some(ups) = self.parents.get(current) {
                stack.extend(ups.iter().map(InlineString::as_str));
            }
        }
        false
    }
}

/// Thread-safe in-memory RBAC store
pub struct MemoryStore {
    state: ArcSwap<StoreState>,
    writer: Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: ArcSwap::from_pointee(StoreState::default()),
            writer: Mutex::new(()),
        }
    }

    /// Build a store from a policy document, validating every link and assignment
    pub fn from_document(doc: PolicyDocument) -> RbacResult<Self> {
        let mut state = StoreState::default();
        for item in doc.items {
            state.insert_item(item)?;
        }
        for ChildLink { parent, child } in doc.children {
            state.link(&parent, &child)?;
        }
        for assignment in doc.assignments {
            state.add_assignment(assignment)?;
        }
        state.default_roles = doc.default_roles;
        state.refresh();

        info!(
            items = state.items.len(),
            permissions = state.permissions.len(),
            subjects = state.assignments.len(),
            "RBAC store loaded"
        );

        Ok(Self {
            state: ArcSwap::from_pointee(state),
            writer: Mutex::new(()),
        })
    }

    /// Load a store from a JSON policy file
    pub fn load(path: impl AsRef<Path>) -> RbacResult<Self> {
        Self::from_document(PolicyDocument::load(path)?)
    }

    /// Snapshot everything except transient assignments
    pub fn to_document(&self) -> PolicyDocument {
        let state = self.state.load();

        let mut children = Vec::new();
        for item in &state.items {
            if let Some(kids) = state.children.get(item.name()) {
                children.extend(kids.iter().map(|child| ChildLink {
                    parent: item.name.clone(),
                    child: child.clone(),
                }));
            }
        }

        let mut assignments: Vec<Assignment> = state
            .assignments
            .values()
            .flatten()
            .filter(|a| !a.transient)
            .cloned()
            .collect();
        assignments.sort_by(|a, b| (&a.subject, &a.item).cmp(&(&b.subject, &b.item)));

        PolicyDocument {
            items: state.items.clone(),
            children,
            assignments,
            default_roles: state.default_roles.clone(),
        }
    }

    /// Write the persistent part of the store to a JSON policy file
    pub fn save(&self, path: impl AsRef<Path>) -> RbacResult<()> {
        self.to_document().save(path)
    }

    fn try_update<R>(
        &self,
        f: impl FnOnce(&mut StoreState) -> Result<R, StoreError>,
    ) -> RbacResult<R> {
        let _guard = self.writer.lock();
        let mut next = StoreState::clone(&self.state.load());
        let out = f(&mut next)?;
        next.refresh();
        self.state.store(Arc::new(next));
        Ok(out)
    }

    fn update<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        let _guard = self.writer.lock();
        let mut next = StoreState::clone(&self.state.load());
        let out = f(&mut next);
        next.refresh();
        self.state.store(Arc::new(next));
        out
    }

    pub fn add_item(&self, item: Item) -> RbacResult<()> {
        debug!(name = %item.name, kind = ?item.item_type, "adding item");
        self.try_update(|state| state.insert_item(item))
    }

    /// Remove an item together with its links and assignments
    pub fn remove_item(&self, name: &str) -> RbacResult<Item> {
        debug!(name, "removing item");
        self.try_update(|state| state.delete_item(name))
    }

    pub fn item(&self, name: &str) -> Option<Item> {
        self.state.load().get(name).cloned()
    }

    /// All items in registration order
    pub fn items(&self) -> Vec<Item> {
        self.state.load().items.clone()
    }

    pub fn add_child(&self, parent: &str, child: &str) -> RbacResult<()> {
        debug!(parent, child, "linking items");
        self.try_update(|state| state.link(parent, child))
    }

    pub fn remove_child(&self, parent: &str, child: &str) -> bool {
        self.update(|state| state.unlink(parent, child))
    }

    /// Direct children of an item
    pub fn children(&self, name: &str) -> Vec<Item> {
        let state = self.state.load();
        state
            .children
            .get(name)
            .map(|kids| kids.iter().filter_map(|k| state.get(k).cloned()).collect())
            .unwrap_or_default()
    }

    /// Persistently assign an item to a subject
    pub fn assign(&self, subject: &SubjectId, item: &str) -> RbacResult<Assignment> {
        let assignment = Assignment::new(subject.clone(), item);
        self.try_update(|state| state.add_assignment(assignment.clone()))?;
        debug!(subject = %subject, item, "assigned");
        Ok(assignment)
    }

    pub fn revoke(&self, subject: &SubjectId, item: &str) -> bool {
        self.update(|state| state.remove_assignment(subject, item, false))
    }

    /// Drop every assignment of a subject, returning how many were removed
    pub fn revoke_all(&self, subject: &SubjectId) -> usize {
        self.update(|state| state.assignments.remove(subject).map_or(0, |l| l.len()))
    }

    pub fn assignments(&self, subject: &SubjectId) -> Vec<Assignment> {
        self.state
            .load()
            .assignments
            .get(subject)
            .cloned()
            .unwrap_or_default()
    }

    /// Items every subject holds implicitly, guests included
    pub fn set_default_roles<I, N>(&self, names: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<InlineString>,
    {
        let names: Vec<InlineString> = names.into_iter().map(Into::into).collect();
        self.update(|state| state.default_roles = names);
    }

    pub fn default_roles(&self) -> Vec<InlineString> {
        self.state.load().default_roles.clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RbacStore for MemoryStore {
    fn permissions(&self) -> Arc<[Item]> {
        Arc::clone(&self.state.load().permissions)
    }

    fn check_grant(&self, subject: &Subject, name: &str, _params: &Params) -> bool {
        self.state.load().grants(subject, name)
    }
}

impl AssignmentStore for MemoryStore {
    fn has_item(&self, name: &str) -> bool {
        self.state.load().index.contains_key(name)
    }

    fn assignment(&self, subject: &SubjectId, item: &str) -> Option<Assignment> {
        self.state.load().find_assignment(subject, item).cloned()
    }

    fn assign_transient(&self, subject: &SubjectId, item: &str) -> RbacResult<Assignment> {
        let assignment = Assignment::transient(subject.clone(), item);
        self.try_update(|state| state.add_assignment(assignment.clone()))?;
        Ok(assignment)
    }

    fn revoke_transient(&self, subject: &SubjectId, item: &str) -> bool {
        let held = self
            .state
            .load()
            .find_assignment(subject, item)
            .is_some_and(|a| a.transient);
        if !held {
            return false;
        }
        self.update(|state| state.remove_assignment(subject, item, true))
    }
}
