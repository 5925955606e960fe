//! Suite method tables.
//!
//! Rust has no method reflection, so a suite lists its methods by name in
//! [`Suite::methods`]. Names are then classified the conventional way:
//! `Test*` names are tests, and the hook names below are lifecycle hooks.
//! Any other name is a helper and is never invoked by the runner.
//!
//! | Name | Runs |
//! |---|---|
//! | `SetupSuite` / `TearDownSuite` | once around all tests |
//! | `SetupTest` / `TearDownTest` | around each test |
//! | `SetupSubTest` / `TearDownSubTest` | around each subtest |
//!
//! `BeforeTest`, `AfterTest` and `HandleStats` take extra arguments and
//! are registered through their own functions.

use bitflags::bitflags;
use vouch_value::value::simple_type_name;

use crate::context::T;
use crate::error::SuiteError;
use crate::stats::SuiteInformation;

pub(crate) type Method<S> = Box<dyn Fn(&mut S, &T) + Send + Sync>;
pub(crate) type TestHook<S> = Box<dyn Fn(&mut S, &T, &str, &str) + Send + Sync>;
pub(crate) type StatsHook<S> = Box<dyn Fn(&mut S, &T, &str, &SuiteInformation) + Send + Sync>;

/// A value whose methods form a test suite.
///
/// ```ignore
/// #[derive(Default)]
/// struct Accounts { db: Option<Db> }
///
/// impl Suite for Accounts {
///     fn methods(m: &mut Methods<Self>) {
///         m.add("SetupTest", |s, _| s.db = Some(Db::open()))
///             .add("TestDeposit", Self::test_deposit)
///             .add("TearDownTest", |s, _| s.db = None);
///     }
/// }
/// ```
pub trait Suite: Sized {
    /// Register the suite's methods.
    fn methods(methods: &mut Methods<Self>);

    /// Receives the context of the test about to run, for methods
    /// registered with [`Methods::add_bare`].
    fn set_t(&mut self, _t: &T) {}

    /// Name used in test names and passed to `BeforeTest`/`AfterTest`.
    fn name() -> String {
        simple_type_name(std::any::type_name::<Self>())
    }
}

bitflags! {
    /// Lifecycle hooks a suite provides.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Lifecycle: u16 {
        const SETUP_SUITE = 1 << 0;
        const TEARDOWN_SUITE = 1 << 1;
        const SETUP_TEST = 1 << 2;
        const TEARDOWN_TEST = 1 << 3;
        const BEFORE_TEST = 1 << 4;
        const AFTER_TEST = 1 << 5;
        const HANDLE_STATS = 1 << 6;
        const SETUP_SUBTEST = 1 << 7;
        const TEARDOWN_SUBTEST = 1 << 8;
    }
}

/// How a registered name is treated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MethodKind {
    Test,
    Hook(Lifecycle),
    Helper,
}

/// Classify a method name.
pub fn classify(name: &str) -> MethodKind {
    match name {
        "SetupSuite" => MethodKind::Hook(Lifecycle::SETUP_SUITE),
        "TearDownSuite" => MethodKind::Hook(Lifecycle::TEARDOWN_SUITE),
        "SetupTest" => MethodKind::Hook(Lifecycle::SETUP_TEST),
        "TearDownTest" => MethodKind::Hook(Lifecycle::TEARDOWN_TEST),
        "SetupSubTest" => MethodKind::Hook(Lifecycle::SETUP_SUBTEST),
        "TearDownSubTest" => MethodKind::Hook(Lifecycle::TEARDOWN_SUBTEST),
        _ if name.starts_with("Test") => MethodKind::Test,
        _ => MethodKind::Helper,
    }
}

/// Names with a dedicated registration function.
fn reserved(name: &str) -> Option<&'static str> {
    match name {
        "BeforeTest" => Some("before_test"),
        "AfterTest" => Some("after_test"),
        "HandleStats" => Some("handle_stats"),
        _ => None,
    }
}

/// The named methods of a suite type.
pub struct Methods<S> {
    methods: Vec<(String, Method<S>)>,
    pub(crate) before_test: Option<TestHook<S>>,
    pub(crate) after_test: Option<TestHook<S>>,
    pub(crate) handle_stats: Option<StatsHook<S>>,
    errors: Vec<SuiteError>,
}

impl<S: Suite> Methods<S> {
    /// Collect the methods `S` registers.
    pub fn of() -> Self {
        let mut methods = Methods {
            methods: Vec::new(),
            before_test: None,
            after_test: None,
            handle_stats: None,
            errors: Vec::new(),
        };
        S::methods(&mut methods);
        methods
    }
}

impl<S> Methods<S> {
    /// Register a method taking the test context.
    pub fn add(&mut self, name: &str, f: impl Fn(&mut S, &T) + Send + Sync + 'static) -> &mut Self {
        if let Some(registrar) = reserved(name) {
            self.errors.push(SuiteError::ReservedName {
                name: name.to_owned(),
                registrar,
            });
        } else if self.methods.iter().any(|(n, _)| n == name) {
            self.errors.push(SuiteError::DuplicateMethod {
                name: name.to_owned(),
            });
        } else {
            self.methods.push((name.to_owned(), Box::new(f)));
        }
        self
    }

    /// Register a method that reads its context from state stored by
    /// [`Suite::set_t`].
    pub fn add_bare(&mut self, name: &str, f: impl Fn(&mut S) + Send + Sync + 'static) -> &mut Self {
        self.add(name, move |s, _| f(s))
    }

    /// Runs after `SetupTest` and before the test, with the suite and
    /// test names.
    pub fn before_test(
        &mut self,
        f: impl Fn(&mut S, &T, &str, &str) + Send + Sync + 'static,
    ) -> &mut Self {
        self.before_test = Some(Box::new(f));
        self
    }

    /// Runs after the test and before `TearDownTest`, with the suite and
    /// test names.
    pub fn after_test(
        &mut self,
        f: impl Fn(&mut S, &T, &str, &str) + Send + Sync + 'static,
    ) -> &mut Self {
        self.after_test = Some(Box::new(f));
        self
    }

    /// Runs after `TearDownSuite` with the collected statistics.
    pub fn handle_stats(
        &mut self,
        f: impl Fn(&mut S, &T, &str, &SuiteInformation) + Send + Sync + 'static,
    ) -> &mut Self {
        self.handle_stats = Some(Box::new(f));
        self
    }

    /// Hooks this table provides.
    pub fn lifecycle(&self) -> Lifecycle {
        let mut lifecycle = Lifecycle::empty();
        for (name, _) in &self.methods {
            if let MethodKind::Hook(hook) = classify(name) {
                lifecycle |= hook;
            }
        }
        lifecycle.set(Lifecycle::BEFORE_TEST, self.before_test.is_some());
        lifecycle.set(Lifecycle::AFTER_TEST, self.after_test.is_some());
        lifecycle.set(Lifecycle::HANDLE_STATS, self.handle_stats.is_some());
        lifecycle
    }

    /// Test names in registration order.
    pub fn tests(&self) -> impl Iterator<Item = &str> {
        self.methods
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| classify(name) == MethodKind::Test)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Method<S>> {
        self.methods
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f)
    }

    /// Registration mistakes, reported when the suite runs.
    pub fn errors(&self) -> &[SuiteError] {
        &self.errors
    }
}

impl<S> std::fmt::Debug for Methods<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.methods.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("Methods")
            .field("methods", &names)
            .field("lifecycle", &self.lifecycle())
            .finish_non_exhaustive()
    }
}
