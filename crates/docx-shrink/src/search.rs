//! Layout search - find the first strategy that renders within the target
//!
//! Strategies are tried in a fixed nested order. Each attempt mutates the
//! previous attempt's output rather than the pristine input, so effects
//! compound and the order matters: a later, milder strategy still carries
//! everything applied before it. The search stops at the first fit and
//! makes no attempt to find a better one.
//!
//! The output path doubles as the chaining scratch file; two searches must
//! not share one.

use crate::constants::MAX_LEVEL;
use crate::mutate::{DocxMutator, LayoutMutator};
use crate::options::ShrinkOptions;
use crate::oracle::{OfficeOracle, PageCountOracle};
use crate::types::*;
use std::path::Path;

/// Every strategy for `max_columns`, in search order
pub fn enumerate_strategies(max_columns: u8, order: SearchOrder) -> Vec<Strategy> {
    match order {
        SearchOrder::LevelMajor => (1..=MAX_LEVEL)
            .flat_map(|level| (1..=max_columns).filter_map(move |cols| Strategy::new(level, cols)))
            .collect(),
        SearchOrder::ColumnMajor => (1..=max_columns)
            .flat_map(|cols| (1..=MAX_LEVEL).filter_map(move |level| Strategy::new(level, cols)))
            .collect(),
    }
}

/// Search driver over a mutator and a page-count oracle
pub struct Shrinker<M, O> {
    mutator: M,
    oracle: O,
    strategies: Vec<Strategy>,
}

impl<M: LayoutMutator, O: PageCountOracle> Shrinker<M, O> {
    pub fn new(mutator: M, oracle: O, max_columns: u8, order: SearchOrder) -> Self {
        Self {
            mutator,
            oracle,
            strategies: enumerate_strategies(max_columns, order),
        }
    }

    /// Strategies this driver will try, in order
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Shrink `input` until it renders to at most `target_pages`, writing
    /// every intermediate and the final document to `output`.
    ///
    /// `on_attempt` sees each evaluated strategy as soon as it is counted.
    /// Mutation and rendering failures abort the search; running out of
    /// strategies is reported as [`ShrinkOutcome::Exhausted`].
    pub async fn shrink(
        &self,
        input: impl AsRef<Path>,
        target_pages: usize,
        output: impl AsRef<Path>,
        mut on_attempt: impl FnMut(&Attempt),
    ) -> Result<ShrinkReport> {
        let output = output.as_ref();
        let mut current = input.as_ref().to_path_buf();
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for &strategy in &self.strategies {
            self.mutator.mutate(&current, output, strategy).await?;
            let pages = self.oracle.count_pages(output).await?;

            let attempt = Attempt { strategy, pages };
            log::info!("Tried {}: {} pages", strategy, pages);
            on_attempt(&attempt);
            attempts.push(attempt);

            if pages <= target_pages {
                return Ok(ShrinkReport {
                    outcome: ShrinkOutcome::Success { pages, strategy },
                    attempts,
                });
            }

            current = output.to_path_buf();
        }

        log::info!(
            "No strategy reached {} pages after {} attempts",
            target_pages,
            attempts.len()
        );
        Ok(ShrinkReport {
            outcome: ShrinkOutcome::Exhausted,
            attempts,
        })
    }
}

/// Shrink a `.docx` file with the office-backed oracle
pub async fn shrink_to_pages(
    input: impl AsRef<Path>,
    target_pages: usize,
    output: impl AsRef<Path>,
    options: &ShrinkOptions,
    on_attempt: impl FnMut(&Attempt),
) -> Result<ShrinkReport> {
    options.validate()?;

    let mutator = DocxMutator::new(options.layout.clone());
    let oracle = OfficeOracle::new(options.render.clone())?;
    let shrinker = Shrinker::new(mutator, oracle, options.max_columns, options.order);

    shrinker.shrink(input, target_pages, output, on_attempt).await
}
