//! Collaborators the reader consults but does not implement.
//!
//! A [`Host`] bundles namespace resolution for `::keywords`, the regex
//! engine behind `#"..."`, the data-reader registries behind `#tag form`,
//! record types behind `#my.Record[...]`, and the read-eval policy.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::form::{Form, Pattern};
use crate::symbol::{Keyword, Symbol};

/// Resolves namespaces for auto-resolving keywords such as `::foo` and
/// `::alias/foo`.
pub trait Resolver: Send + Sync {
    /// The name of the current namespace, if any.
    fn current_ns(&self) -> Option<Symbol>;

    /// Resolves an alias of the current namespace, or the name of a known
    /// namespace, to a namespace name.
    fn resolve_ns(&self, name: &str) -> Option<Symbol>;
}

/// A fixed namespace table.
///
/// ```
/// use cst_reader::host::{Resolver, StaticResolver};
///
/// let resolver = StaticResolver::new("app.core").with_alias("str", "clojure.string");
/// assert_eq!(resolver.current_ns().unwrap().name(), "app.core");
/// assert_eq!(resolver.resolve_ns("str").unwrap().name(), "clojure.string");
/// assert!(resolver.resolve_ns("unknown").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct StaticResolver {
    current: Box<str>,
    aliases: HashMap<Box<str>, Box<str>>,
    namespaces: HashSet<Box<str>>,
}

impl StaticResolver {
    /// A table whose current namespace is `current`.
    pub fn new(current: &str) -> Self {
        let mut namespaces = HashSet::new();
        namespaces.insert(current.into());
        StaticResolver {
            current: current.into(),
            aliases: HashMap::new(),
            namespaces,
        }
    }

    /// Adds an alias of the current namespace; the target becomes known.
    pub fn with_alias(mut self, alias: &str, ns: &str) -> Self {
        self.aliases.insert(alias.into(), ns.into());
        self.namespaces.insert(ns.into());
        self
    }

    /// Adds a known namespace.
    pub fn with_namespace(mut self, ns: &str) -> Self {
        self.namespaces.insert(ns.into());
        self
    }
}

impl Default for StaticResolver {
    fn default() -> Self {
        StaticResolver::new("user")
    }
}

impl Resolver for StaticResolver {
    fn current_ns(&self) -> Option<Symbol> {
        Some(Symbol::simple(&self.current))
    }

    fn resolve_ns(&self, name: &str) -> Option<Symbol> {
        if let Some(ns) = self.aliases.get(name) {
            return Some(Symbol::simple(ns));
        }
        self.namespaces.get(name).map(|ns| Symbol::simple(ns))
    }
}

/// Compiles the verbatim body of a regex literal into a form.
pub trait PatternEngine: Send + Sync {
    /// Returns the pattern value, or a message describing why the body is
    /// not a valid pattern.
    fn compile(&self, source: &str) -> Result<Form, String>;
}

impl<F> PatternEngine for F
where
    F: Fn(&str) -> Result<Form, String> + Send + Sync,
{
    fn compile(&self, source: &str) -> Result<Form, String> {
        self(source)
    }
}

/// Compiles patterns with the `regex` crate into [`Form::Pattern`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexEngine;

impl PatternEngine for RegexEngine {
    fn compile(&self, source: &str) -> Result<Form, String> {
        let regex = Regex::new(source).map_err(|e| e.to_string())?;
        Ok(Form::Pattern(Pattern::new(source, Some(regex))))
    }
}

/// A data reader function, invoked on the form following its tag.
pub type DataReaderFn = Arc<dyn Fn(&Form) -> Result<Form, String> + Send + Sync>;

/// The fallback invoked with the tag and form when no reader is registered.
pub type DefaultReaderFn = Arc<dyn Fn(&Symbol, &Form) -> Result<Form, String> + Send + Sync>;

/// Tagged-literal registries, consulted in order: explicit readers, default
/// readers, then the default reader function.
#[derive(Clone)]
pub struct DataReaders {
    readers: HashMap<Symbol, DataReaderFn>,
    defaults: HashMap<Symbol, DataReaderFn>,
    default_fn: Option<DefaultReaderFn>,
}

impl DataReaders {
    /// Registries with no readers at all, not even `#inst` and `#uuid`.
    pub fn empty() -> Self {
        DataReaders {
            readers: HashMap::new(),
            defaults: HashMap::new(),
            default_fn: None,
        }
    }

    /// Registers a reader for `tag`.
    pub fn with_reader<F>(mut self, tag: &str, f: F) -> Self
    where
        F: Fn(&Form) -> Result<Form, String> + Send + Sync + 'static,
    {
        self.readers.insert(Symbol::parse(tag), Arc::new(f));
        self
    }

    /// Installs the fallback for tags without a reader.
    pub fn with_default_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Symbol, &Form) -> Result<Form, String> + Send + Sync + 'static,
    {
        self.default_fn = Some(Arc::new(f));
        self
    }

    /// Runs the first reader that handles `tag`. Returns `None` when nothing
    /// does.
    pub fn read(&self, tag: &Symbol, form: &Form) -> Option<Result<Form, String>> {
        if let Some(reader) = self.readers.get(tag) {
            debug!(%tag, "explicit data reader");
            return Some(reader(form));
        }
        if let Some(reader) = self.defaults.get(tag) {
            debug!(%tag, "default data reader");
            return Some(reader(form));
        }
        self.default_fn.as_ref().map(|f| {
            debug!(%tag, "default data reader function");
            f(tag, form)
        })
    }
}

impl Default for DataReaders {
    /// Registries holding the default `#inst` and `#uuid` readers.
    fn default() -> Self {
        let mut readers = DataReaders::empty();
        readers
            .defaults
            .insert(Symbol::simple("inst"), Arc::new(read_inst));
        readers
            .defaults
            .insert(Symbol::simple("uuid"), Arc::new(read_uuid));
        readers
    }
}

impl fmt::Debug for DataReaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataReaders")
            .field("readers", &self.readers.keys().collect::<Vec<_>>())
            .field("defaults", &self.defaults.keys().collect::<Vec<_>>())
            .field("default_fn", &self.default_fn.is_some())
            .finish()
    }
}

type Compiled = Lazy<Result<Regex, String>>;

static TIMESTAMP: Compiled = Lazy::new(|| {
    Regex::new(r"^\d{4}(-\d{2}(-\d{2}(T\d{2}(:\d{2}(:\d{2}(\.\d+)?)?)?(Z|[-+]\d{2}:\d{2})?)?)?)?$")
        .map_err(|e| e.to_string())
});

static UUID: Compiled = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .map_err(|e| e.to_string())
});

fn tagged_string(tag: &str, form: &Form, re: &Compiled, what: &str) -> Result<Form, String> {
    let s = form
        .as_str()
        .ok_or_else(|| format!("{} literal expects a string", what))?;
    let re = match &**re {
        Ok(re) => re,
        Err(e) => return Err(e.clone()),
    };
    if re.is_match(s) {
        Ok(Form::tagged(Symbol::simple(tag), form.clone()))
    } else {
        Err(format!("Unrecognized {}: {}", what, s))
    }
}

fn read_inst(form: &Form) -> Result<Form, String> {
    tagged_string("inst", form, &TIMESTAMP, "timestamp")
}

fn read_uuid(form: &Form) -> Result<Form, String> {
    tagged_string("uuid", form, &UUID, "UUID")
}

/// A record type constructible with `#ns.Name[...]` or `#ns.Name{...}`.
pub trait RecordType: Send + Sync {
    /// Returns true if a positional constructor takes `n` fields.
    fn accepts_arity(&self, n: usize) -> bool;

    /// Constructs a record from positional fields.
    fn from_positional(&self, name: &Symbol, fields: Vec<Form>) -> Result<Form, String>;

    /// Constructs a record from keyword-keyed entries.
    fn from_map(&self, name: &Symbol, entries: Vec<(Keyword, Form)>) -> Result<Form, String>;
}

/// A record type with named fields, constructed as a tagged map literal.
///
/// ```
/// use cst_reader::host::{FieldRecord, RecordType};
/// use cst_reader::{Form, Symbol};
///
/// let point = FieldRecord::new(&["x", "y"]);
/// let rec = point
///     .from_positional(&Symbol::parse("geo.Point"), vec![Form::from(1), Form::from(2)])
///     .unwrap();
/// assert_eq!(rec.to_string(), "#geo.Point {:x 1 :y 2}");
/// ```
#[derive(Debug, Clone)]
pub struct FieldRecord {
    fields: Vec<Keyword>,
}

impl FieldRecord {
    /// A record type with the given field names.
    pub fn new(fields: &[&str]) -> Self {
        FieldRecord {
            fields: fields.iter().map(|f| Keyword::new(None, f)).collect(),
        }
    }
}

impl RecordType for FieldRecord {
    fn accepts_arity(&self, n: usize) -> bool {
        n == self.fields.len()
    }

    fn from_positional(&self, name: &Symbol, fields: Vec<Form>) -> Result<Form, String> {
        let entries = self.fields.iter().cloned().zip(fields).collect();
        self.from_map(name, entries)
    }

    fn from_map(&self, name: &Symbol, entries: Vec<(Keyword, Form)>) -> Result<Form, String> {
        let map = Form::map(
            entries
                .into_iter()
                .flat_map(|(k, v)| vec![Form::Keyword(k), v]),
        );
        Ok(Form::tagged(name.clone(), map))
    }
}

/// The policy for `#=` and record literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadEval {
    /// `#=` and record literals are read.
    Enabled,
    /// `#=` and record literals are errors.
    Disabled,
    /// Every read is an error.
    Unknown,
}

/// The collaborators of a parser.
#[derive(Clone)]
pub struct Host {
    resolver: Arc<dyn Resolver>,
    patterns: Arc<dyn PatternEngine>,
    data_readers: DataReaders,
    records: HashMap<Symbol, Arc<dyn RecordType>>,
    read_eval: ReadEval,
}

impl Host {
    /// The default host: current namespace `user`, the `regex` engine, the
    /// `#inst` and `#uuid` readers, no records, and read-eval enabled.
    pub fn new() -> Self {
        Host {
            resolver: Arc::new(StaticResolver::default()),
            patterns: Arc::new(RegexEngine),
            data_readers: DataReaders::default(),
            records: HashMap::new(),
            read_eval: ReadEval::Enabled,
        }
    }

    /// Replaces the namespace resolver.
    pub fn with_resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Replaces the pattern engine.
    pub fn with_patterns(mut self, engine: impl PatternEngine + 'static) -> Self {
        self.patterns = Arc::new(engine);
        self
    }

    /// Replaces the data-reader registries.
    pub fn with_data_readers(mut self, readers: DataReaders) -> Self {
        self.data_readers = readers;
        self
    }

    /// Registers a record type under its fully qualified name.
    pub fn with_record(mut self, name: &str, record: impl RecordType + 'static) -> Self {
        self.records.insert(Symbol::parse(name), Arc::new(record));
        self
    }

    /// Sets the read-eval policy.
    pub fn with_read_eval(mut self, policy: ReadEval) -> Self {
        self.read_eval = policy;
        self
    }

    /// The namespace resolver.
    pub fn resolver(&self) -> &dyn Resolver {
        &*self.resolver
    }

    /// The pattern engine.
    pub fn patterns(&self) -> &dyn PatternEngine {
        &*self.patterns
    }

    /// The data-reader registries.
    pub fn data_readers(&self) -> &DataReaders {
        &self.data_readers
    }

    /// Looks up a record type by its fully qualified name.
    pub fn record(&self, name: &Symbol) -> Option<&dyn RecordType> {
        self.records.get(name).map(|r| &**r)
    }

    /// The read-eval policy.
    pub fn read_eval(&self) -> ReadEval {
        self.read_eval
    }
}

impl Default for Host {
    fn default() -> Self {
        Host::new()
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("data_readers", &self.data_readers)
            .field("records", &self.records.keys().collect::<Vec<_>>())
            .field("read_eval", &self.read_eval)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_readers_validate() {
        let readers = DataReaders::default();
        let inst = Symbol::simple("inst");
        let ok = readers.read(&inst, &Form::from("2024-01-02T03:04:05.678Z"));
        assert!(matches!(ok, Some(Ok(Form::Tagged(_)))));
        let bad = readers.read(&inst, &Form::from("yesterday"));
        assert!(matches!(bad, Some(Err(_))));
        let uuid = Symbol::simple("uuid");
        let ok = readers.read(&uuid, &Form::from("123e4567-e89b-12d3-a456-426614174000"));
        assert!(matches!(ok, Some(Ok(_))));
        assert!(readers.read(&Symbol::simple("nope"), &Form::Nil).is_none());
    }

    #[test]
    fn reader_patterns_are_shared() {
        assert!(TIMESTAMP.is_ok());
        assert!(UUID.is_ok());
        let first = Lazy::force(&UUID).as_ref().ok().map(|re| re as *const Regex);
        for _ in 0..3 {
            let readers = DataReaders::default();
            let uuid = Symbol::simple("uuid");
            let bad = readers.read(&uuid, &Form::from("123e4567"));
            assert_eq!(bad, Some(Err("Unrecognized UUID: 123e4567".to_string())));
        }
        let again = Lazy::force(&UUID).as_ref().ok().map(|re| re as *const Regex);
        assert_eq!(first, again);
    }

    #[test]
    fn explicit_reader_wins() {
        let readers = DataReaders::default().with_reader("inst", |_| Ok(Form::from(0)));
        let got = readers.read(&Symbol::simple("inst"), &Form::from("2024"));
        assert_eq!(got, Some(Ok(Form::from(0))));
    }

    #[test]
    fn default_fn_is_last() {
        let readers = DataReaders::empty().with_default_fn(|tag, form| {
            Ok(Form::tagged(tag.clone(), form.clone()))
        });
        let got = readers.read(&Symbol::simple("x"), &Form::from(1));
        assert_eq!(got, Some(Ok(Form::tagged(Symbol::simple("x"), Form::from(1)))));
    }
}
