//! Field extraction heuristics
//!
//! Each catalog field is derived by an ordered `FieldChain`: strategies are
//! tried in sequence, the first non-empty result wins, and a named default
//! is used when all of them come up empty. Chains never fail.

mod fields;

pub use fields::{
    format_chain, id_chain, quality_chain, size_chain, title_chain, year_chain, FieldExtractors,
    SizeInput, TitleInput, DEFAULT_FORMAT, UNKNOWN,
};

type StrategyFn<I> = dyn Fn(&I) -> Option<String> + Send + Sync;

/// One named way of deriving a field value
pub struct Strategy<I: ?Sized> {
    name: &'static str,
    apply: Box<StrategyFn<I>>,
}

impl<I: ?Sized> Strategy<I> {
    /// The strategy's name, used in debug logging
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runs this strategy alone; empty results count as no match
    pub fn apply(&self, input: &I) -> Option<String> {
        (self.apply)(input)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Ordered fallback chain for one field
pub struct FieldChain<I: ?Sized> {
    field: &'static str,
    strategies: Vec<Strategy<I>>,
    default: &'static str,
}

impl<I: ?Sized> FieldChain<I> {
    /// Creates an empty chain that always yields `default`
    pub fn new(field: &'static str, default: &'static str) -> Self {
        Self {
            field,
            strategies: Vec::new(),
            default,
        }
    }

    /// Appends a strategy, tried after every strategy already present
    pub fn then<F>(mut self, name: &'static str, apply: F) -> Self
    where
        F: Fn(&I) -> Option<String> + Send + Sync + 'static,
    {
        self.strategies.push(Strategy {
            name,
            apply: Box::new(apply),
        });
        self
    }

    /// Name of the field this chain extracts
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Value used when no strategy matches
    pub fn default_value(&self) -> &'static str {
        self.default
    }

    /// Strategies in the order they are tried
    pub fn strategies(&self) -> &[Strategy<I>] {
        &self.strategies
    }

    /// Resolves the field value
    pub fn resolve(&self, input: &I) -> String {
        self.resolve_traced(input).0
    }

    /// Resolves the field value and reports which strategy produced it
    ///
    /// The second element is `None` when the default was used.
    pub fn resolve_traced(&self, input: &I) -> (String, Option<&'static str>) {
        for strategy in &self.strategies {
            if let Some(value) = strategy.apply(input) {
                return (value, Some(strategy.name));
            }
        }
        (self.default.to_string(), None)
    }
}
