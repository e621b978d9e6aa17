//! Namespaced registry of named typeval values.
//!
//! A [`Loader`] maps names to frozen [`Value`]s. Entries are given up front
//! or produced on first use by a finder. Namespaces are nested loaders
//! produced on first use by a namespace creator and addressed with slash
//! separated paths:
//!
//! ```text
//! loader.load("a/b/c")   // namespace "a", then "b", then entry "c"
//! ```
//!
//! # Thread Safety
//!
//! Lookups take a shared lock. A miss claims the name before running the
//! finder, so concurrent callers asking for the same name wait for the
//! first one to publish instead of running the finder twice. Finders and
//! namespace creators run without any lock held and may look up other
//! names on the same loader. Looking up the name being produced from
//! inside its own finder blocks forever.

mod error;

use std::fmt;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex, RwLock};
use rustc_hash::{FxHashMap, FxHashSet};
use typeval::Value;

pub use error::LoaderError;

/// Produces the entry for a name on first use.
pub type Finder = Arc<dyn Fn(&Loader, &str) -> Found + Send + Sync>;

/// Produces the namespace for a name on first use.
pub type NsCreator = Arc<dyn Fn(&Loader, &str) -> Option<Loader> + Send + Sync>;

/// What a finder produced for a requested name.
#[derive(Clone, Debug)]
pub enum Found {
    /// Nothing by that name. The miss is remembered.
    Missing,
    /// The requested value.
    One(Value),
    /// Several entries published together. Must contain the requested name.
    Multiple(Vec<(String, Value)>),
}

impl Found {
    /// Bundle several entries into one finder result.
    pub fn multiple<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Found::Multiple(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<Value> for Found {
    fn from(v: Value) -> Self {
        if v.is_nil() {
            Found::Missing
        } else {
            Found::One(v)
        }
    }
}

impl From<Option<Value>> for Found {
    fn from(v: Option<Value>) -> Self {
        v.map_or(Found::Missing, Found::from)
    }
}

#[derive(Default)]
struct State {
    /// Published entries. `Nil` records a remembered miss.
    entries: FxHashMap<String, Value>,
    namespaces: FxHashMap<String, Loader>,
}

struct Core {
    name: String,
    absolute_name: String,
    state: RwLock<State>,
    /// Names whose finder is currently running.
    claims: Mutex<FxHashSet<String>>,
    published: Condvar,
    finder: Option<Finder>,
    ns_creator: Option<NsCreator>,
}

/// A namespaced, thread-safe registry of named values.
///
/// Cloning is cheap and yields a handle to the same registry.
#[derive(Clone)]
pub struct Loader {
    core: Arc<Core>,
    /// Consulted before this loader's own entries and namespaces.
    parent: Option<Arc<Loader>>,
}

impl Loader {
    /// Start building a loader called `name`.
    pub fn builder(name: impl Into<String>) -> LoaderBuilder {
        LoaderBuilder {
            name: name.into(),
            parent_ns: None,
            parent: None,
            entries: Vec::new(),
            finder: None,
            ns_creator: None,
        }
    }

    /// Start building a loader that consults `self` first.
    ///
    /// The child shares this loader's name and place in the namespace tree.
    pub fn child(&self) -> LoaderBuilder {
        LoaderBuilder {
            name: self.core.name.clone(),
            parent_ns: None,
            parent: Some(self.clone()),
            entries: Vec::new(),
            finder: None,
            ns_creator: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// The slash separated path from the root namespace, e.g. `/a/b`.
    pub fn absolute_name(&self) -> &str {
        &self.core.absolute_name
    }

    pub fn parent(&self) -> Option<&Loader> {
        self.parent.as_deref()
    }

    /// The value published under `name`, running the finder on first use.
    pub fn get(&self, name: &str) -> Result<Option<Value>, LoaderError> {
        if let Some(parent) = &self.parent {
            if let Some(v) = parent.get(name)? {
                return Ok(Some(v));
            }
        }
        self.get_own(name)
    }

    /// Resolve a slash separated path through namespaces to an entry.
    ///
    /// Returns `None` when a namespace along the way does not exist.
    pub fn load(&self, path: &str) -> Result<Option<Value>, LoaderError> {
        let (dirs, last) = match path.rsplit_once('/') {
            Some((dirs, last)) => (Some(dirs), last),
            None => (None, path),
        };
        let mut current = self.clone();
        for part in dirs.into_iter().flat_map(|d| d.split('/')) {
            match current.namespace(part)? {
                Some(ns) => current = ns,
                None => return Ok(None),
            }
        }
        current.get(last)
    }

    /// The namespace called `name`, creating it on first use.
    ///
    /// The empty name denotes this loader. When both this loader and its
    /// parent know the namespace, the result consults the parent's first.
    pub fn namespace(&self, name: &str) -> Result<Option<Loader>, LoaderError> {
        if name.is_empty() {
            return Ok(Some(self.clone()));
        }
        let inherited = match &self.parent {
            Some(parent) => parent.namespace(name)?,
            None => None,
        };
        let own = self.own_namespace(name)?;
        Ok(match (own, inherited) {
            (None, inherited) => inherited,
            (Some(own), None) => Some(own),
            (Some(own), Some(inherited)) => Some(Loader {
                core: own.core,
                parent: Some(Arc::new(inherited)),
            }),
        })
    }

    fn lookup(&self, name: &str) -> Option<Value> {
        self.core.state.read().entries.get(name).cloned()
    }

    fn get_own(&self, name: &str) -> Result<Option<Value>, LoaderError> {
        if let Some(v) = self.lookup(name) {
            return Ok(present(v));
        }
        let Some(finder) = &self.core.finder else {
            return Ok(None);
        };
        let _claim = match self.claim(name) {
            Ok(claim) => claim,
            Err(published) => return Ok(present(published)),
        };
        let found = finder(self, name);
        self.publish(name, found).map(present)
    }

    /// Claim `name` for this thread, or wait for whoever holds the claim to
    /// publish. Returns the published value in the latter case.
    fn claim(&self, name: &str) -> Result<Claim<'_>, Value> {
        let mut claims = self.core.claims.lock();
        loop {
            if let Some(v) = self.lookup(name) {
                return Err(v);
            }
            if claims.insert(name.to_owned()) {
                return Ok(Claim {
                    core: &self.core,
                    name: name.to_owned(),
                });
            }
            self.core.published.wait(&mut claims);
        }
    }

    #[tracing::instrument(level = "debug", skip(self, found), fields(loader = %self.core.absolute_name))]
    fn publish(&self, name: &str, found: Found) -> Result<Value, LoaderError> {
        let mut state = self.core.state.write();
        match found {
            Found::Missing => {
                tracing::trace!("remembering miss");
                add_entry(&mut state.entries, name, Value::Nil)
            }
            Found::One(v) => add_entry(&mut state.entries, name, v),
            Found::Multiple(bundle) => {
                let mut staged: FxHashMap<String, Value> = FxHashMap::default();
                for (key, value) in bundle {
                    let value = value.frozen_copy();
                    let clashes = |old: &Value| !old.equals(&value);
                    if staged.get(&key).is_some_and(clashes)
                        || state.entries.get(&key).is_some_and(clashes)
                    {
                        return Err(LoaderError::AttemptToOverride { name: key });
                    }
                    staged.insert(key, value);
                }
                let Some(requested) = staged.get(name).cloned() else {
                    return Err(LoaderError::MissingRequestedKey {
                        name: name.to_owned(),
                    });
                };
                tracing::debug!(count = staged.len(), "publishing bundle");
                for (key, value) in staged {
                    state.entries.entry(key).or_insert(value);
                }
                Ok(requested)
            }
        }
    }

    fn own_namespace(&self, name: &str) -> Result<Option<Loader>, LoaderError> {
        if let Some(ns) = self.core.state.read().namespaces.get(name) {
            return Ok(Some(ns.clone()));
        }
        let Some(creator) = &self.core.ns_creator else {
            return Ok(None);
        };
        let Some(created) = creator(self, name) else {
            return Ok(None);
        };

        let mut state = self.core.state.write();
        if let Some(old) = state.namespaces.get(name) {
            // Another thread won the race. Keep its loader.
            if old.absolute_name() != created.absolute_name() {
                return Err(LoaderError::NamespaceDefined {
                    name: name.to_owned(),
                });
            }
            return Ok(Some(old.clone()));
        }
        tracing::debug!(loader = %self.core.absolute_name, namespace = name, "namespace created");
        state.namespaces.insert(name.to_owned(), created.clone());
        Ok(Some(created))
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("absolute_name", &self.core.absolute_name)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

/// Releases a claim and wakes waiters, whether or not the finder succeeded.
struct Claim<'a> {
    core: &'a Core,
    name: String,
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        let mut claims = self.core.claims.lock();
        claims.remove(&self.name);
        self.core.published.notify_all();
    }
}

/// Builder for [`Loader`].
pub struct LoaderBuilder {
    name: String,
    parent_ns: Option<String>,
    parent: Option<Loader>,
    entries: Vec<(String, Value)>,
    finder: Option<Finder>,
    ns_creator: Option<NsCreator>,
}

impl LoaderBuilder {
    /// Place the loader as a namespace of `parent`.
    #[must_use]
    pub fn within(mut self, parent: &Loader) -> Self {
        self.parent_ns = Some(parent.absolute_name().to_owned());
        self
    }

    #[must_use]
    pub fn entry(mut self, name: impl Into<String>, value: Value) -> Self {
        self.entries.push((name.into(), value));
        self
    }

    #[must_use]
    pub fn entries<I, K>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.entries
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    #[must_use]
    pub fn finder<F>(mut self, finder: F) -> Self
    where
        F: Fn(&Loader, &str) -> Found + Send + Sync + 'static,
    {
        self.finder = Some(Arc::new(finder));
        self
    }

    #[must_use]
    pub fn namespaces<F>(mut self, creator: F) -> Self
    where
        F: Fn(&Loader, &str) -> Option<Loader> + Send + Sync + 'static,
    {
        self.ns_creator = Some(Arc::new(creator));
        self
    }

    /// Freeze the initial entries and create the loader.
    ///
    /// Fails when the same name is given two unequal values.
    pub fn build(self) -> Result<Loader, LoaderError> {
        let mut entries = FxHashMap::default();
        for (name, value) in self.entries {
            add_entry(&mut entries, &name, value)?;
        }

        let absolute_name = match (&self.parent, self.parent_ns) {
            (Some(parent), _) => parent.absolute_name().to_owned(),
            (None, Some(ns)) if ns != "/" => format!("{ns}/{}", self.name),
            (None, _) => format!("/{}", self.name),
        };

        Ok(Loader {
            core: Arc::new(Core {
                name: self.name,
                absolute_name,
                state: RwLock::new(State {
                    entries,
                    namespaces: FxHashMap::default(),
                }),
                claims: Mutex::new(FxHashSet::default()),
                published: Condvar::new(),
                finder: self.finder,
                ns_creator: self.ns_creator,
            }),
            parent: self.parent.map(Arc::new),
        })
    }
}

/// Publish `value` under `name` unless an equal value is already there.
fn add_entry(
    entries: &mut FxHashMap<String, Value>,
    name: &str,
    value: Value,
) -> Result<Value, LoaderError> {
    let value = value.frozen_copy();
    match entries.get(name) {
        None => {
            entries.insert(name.to_owned(), value.clone());
            Ok(value)
        }
        Some(old) if old.equals(&value) => Ok(old.clone()),
        Some(_) => Err(LoaderError::AttemptToOverride {
            name: name.to_owned(),
        }),
    }
}

fn present(v: Value) -> Option<Value> {
    if v.is_nil() {
        None
    } else {
        Some(v)
    }
}

const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Loader>();
};
