use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{Error, Fault, Result};
use crate::intcode::run_with_overrides;
use crate::program;

/// Configuration for a noun/verb search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Output value the program must leave at position 0.
    pub target: i64,
    /// Nouns are drawn from `0..noun_limit`; a limit of zero or below means no trials.
    pub noun_limit: i64,
    /// Verbs are drawn from `0..verb_limit`.
    pub verb_limit: i64,
    /// Spread trials over the rayon thread pool.
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            target: 19_690_720,
            noun_limit: 100,
            verb_limit: 100,
            parallel: true,
        }
    }
}

/// A noun/verb pair that makes the program produce the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    pub noun: i64,
    pub verb: i64,
}

impl Solution {
    /// The puzzle's combined answer, `100 * noun + verb`.
    pub fn answer(&self) -> i64 {
        100 * self.noun + self.verb
    }
}

/// Try every noun/verb pair against a fresh copy of `program`.
///
/// Trials are ordered noun-major: all verbs for noun 0, then noun 1, and so
/// on. The first pair in that order whose output equals the target wins, in
/// parallel mode too. A fault aborts the search only if it comes before any
/// match in that order, so both modes report the same outcome.
pub fn search(
    program: &[i64],
    config: &SearchConfig,
) -> std::result::Result<Option<Solution>, Fault> {
    debug!(
        nouns = config.noun_limit,
        verbs = config.verb_limit,
        target = config.target,
        parallel = config.parallel,
        "search started"
    );

    let verb_limit = config.verb_limit;
    let pairs = move |noun: i64| (0..verb_limit).map(move |verb| Solution { noun, verb });
    let trial = |candidate: Solution| {
        match run_with_overrides(program, candidate.noun, candidate.verb) {
            Ok(output) if output == config.target => Some(Ok(candidate)),
            Ok(_) => None,
            Err(fault) => Some(Err(fault)),
        }
    };

    let found = if config.parallel {
        (0..config.noun_limit)
            .into_par_iter()
            .flat_map_iter(pairs)
            .find_map_first(trial)
    } else {
        (0..config.noun_limit).flat_map(pairs).find_map(trial)
    };

    match &found {
        Some(Ok(solution)) => info!(
            noun = solution.noun,
            verb = solution.verb,
            answer = solution.answer(),
            "search resolved"
        ),
        Some(Err(fault)) => debug!(%fault, "search aborted"),
        None => debug!("search exhausted without a match"),
    }
    found.transpose()
}

/// Parse `code` and search it, treating an exhausted search as an error.
pub fn solve(code: &str, config: &SearchConfig) -> Result<Solution> {
    let program = program::parse(code)?;
    search(&program, config)?.ok_or(Error::NoSolution {
        target: config.target,
    })
}
