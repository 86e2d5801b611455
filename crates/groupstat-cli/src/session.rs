//! The interactive test dispatcher.
//!
//! A session asks for the dependent and grouping columns, walks the test
//! selection stages, runs exactly one test and prints its report:
//!
//! ```text
//! AwaitingTestFamily --t-test--> AwaitingTTestSubtype --kind--> Running --> Done
//!         \------------------ANOVA------------------------------^
//! ```
//!
//! Failures that belong to the data or the statistics (wrong number of
//! groups, non-numeric values, degenerate samples) end the session with a
//! printed error and an [`Outcome::Aborted`]. Prompt and output I/O failures
//! propagate as errors.

use std::{fmt, io::Write};

use groupstat_data::{
    DataError,
    cell::GroupLabel,
    dataset::{Dataset, DatasetView},
    groups::{Group, extract_groups, value_slices},
    pairing::{Alignment, PairedSamples, PairingColumns, pivot_pairs},
};
use groupstat_stats::{
    StatsError,
    anova::OneWayAnova,
    ttest::{self, TTestResult},
};

use crate::{
    post_hoc::{self, PostHoc},
    prompt::{self, Choice, Prompter},
    report,
};

/// Options fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Settings {
    /// Significance level gating post-hoc tests and their reject flags.
    pub(crate) alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
enum TestFamily {
    #[display("t-test (two groups)")]
    TTest,
    #[display("One-way ANOVA")]
    Anova,
}

impl Choice for TestFamily {
    const ALL: &'static [Self] = &[TestFamily::TTest, TestFamily::Anova];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub(crate) enum TTestKind {
    #[display("Independent samples t-test")]
    Independent,
    #[display("Paired samples t-test")]
    Paired,
    #[display("One-sample t-test")]
    OneSample,
}

impl Choice for TTestKind {
    const ALL: &'static [Self] = &[TTestKind::Independent, TTestKind::Paired, TTestKind::OneSample];
}

/// The single test a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub(crate) enum TestSelection {
    #[display("{_0}")]
    TTest(TTestKind),
    #[display("One-way ANOVA")]
    Anova,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnChoice {
    dependent: usize,
    grouping: usize,
}

#[derive(Debug)]
enum Stage {
    AwaitingTestFamily,
    AwaitingTTestSubtype,
    Running(TestSelection),
    Done(Outcome),
}

/// The numbers a test was computed from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Samples {
    Groups(Vec<Group>),
    Paired(PairedSamples),
    Single {
        population_mean: f64,
        values: Vec<f64>,
    },
}

impl Samples {
    fn observation_count(&self) -> usize {
        match self {
            Samples::Groups(groups) => groups.iter().map(|g| g.values.len()).sum(),
            Samples::Paired(pairs) => pairs.len() * 2,
            Samples::Single { values, .. } => values.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Statistic {
    TTest(TTestResult),
    Anova(OneWayAnova),
}

impl Statistic {
    fn p_value(&self) -> f64 {
        match self {
            Statistic::TTest(result) => result.p_value,
            Statistic::Anova(anova) => anova.p_value,
        }
    }
}

/// A completed test and, for a significant ANOVA, its post-hoc comparisons.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Analysis {
    pub(crate) selection: TestSelection,
    pub(crate) samples: Samples,
    pub(crate) statistic: Statistic,
    pub(crate) post_hoc: Option<PostHoc>,
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} observations, p={:.4}",
            self.selection,
            self.samples.observation_count(),
            self.statistic.p_value()
        )?;
        if let Samples::Single {
            population_mean, ..
        } = self.samples
        {
            write!(f, ", tested against {population_mean}")?;
        }
        match &self.post_hoc {
            Some(PostHoc::Tukey(hsd)) => {
                write!(f, ", Tukey HSD over {} pairs", hsd.comparisons.len())
            }
            Some(PostHoc::Bonferroni(pairs)) => {
                write!(f, ", Bonferroni over {} pairs", pairs.len())
            }
            None => Ok(()),
        }
    }
}

/// Why a session ended without a result.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub(crate) enum Abort {
    #[display("{test} requires exactly {expected} groups, found {found}")]
    GroupCount {
        test: TestSelection,
        expected: usize,
        found: usize,
    },
    #[display("group {label} has no observations")]
    EmptyGroup { label: GroupLabel },
    #[display("{_0}")]
    Data(DataError),
    #[display("{_0}")]
    Stats(StatsError),
}

#[derive(Debug, derive_more::Display)]
pub(crate) enum Outcome {
    #[display("{_0}")]
    Completed(Box<Analysis>),
    #[display("aborted: {_0}")]
    Aborted(Abort),
}

/// One interactive run over a loaded dataset.
pub(crate) struct Session<'a, P: ?Sized, W: ?Sized> {
    dataset: &'a Dataset,
    prompter: &'a mut P,
    out: &'a mut W,
    settings: Settings,
}

impl<'a, P, W> Session<'a, P, W>
where
    P: Prompter + ?Sized,
    W: Write + ?Sized,
{
    pub(crate) fn new(
        dataset: &'a Dataset,
        prompter: &'a mut P,
        out: &'a mut W,
        settings: Settings,
    ) -> Self {
        Self {
            dataset,
            prompter,
            out,
            settings,
        }
    }

    /// Selects columns, walks the selection stages and runs one test.
    pub(crate) fn run(mut self) -> anyhow::Result<Outcome> {
        let names = self.dataset.column_names();
        let dependent =
            prompt::choose_column(&mut *self.prompter, "Choose dependent variable:", &names)?;
        let grouping =
            prompt::choose_column(&mut *self.prompter, "Choose grouping variable:", &names)?;
        tracing::info!(
            dependent = %names[dependent],
            grouping = %names[grouping],
            "columns selected"
        );
        let columns = ColumnChoice {
            dependent,
            grouping,
        };

        let mut stage = Stage::AwaitingTestFamily;
        loop {
            tracing::trace!(?stage, "dispatcher stage");
            stage = match stage {
                Stage::AwaitingTestFamily => {
                    match prompt::choose(&mut *self.prompter, "Choose test type:")? {
                        TestFamily::TTest => Stage::AwaitingTTestSubtype,
                        TestFamily::Anova => Stage::Running(TestSelection::Anova),
                    }
                }
                Stage::AwaitingTTestSubtype => Stage::Running(TestSelection::TTest(
                    prompt::choose(&mut *self.prompter, "Choose t-test type:")?,
                )),
                Stage::Running(selection) => Stage::Done(self.execute(selection, columns)?),
                Stage::Done(outcome) => return Ok(outcome),
            };
        }
    }

    fn execute(
        &mut self,
        selection: TestSelection,
        columns: ColumnChoice,
    ) -> anyhow::Result<Outcome> {
        tracing::info!(%selection, "running test");
        let result = match selection {
            TestSelection::TTest(TTestKind::Independent) => self.independent(columns),
            TestSelection::TTest(TTestKind::Paired) => self.paired(columns),
            TestSelection::TTest(TTestKind::OneSample) => self.one_sample(columns),
            TestSelection::Anova => self.anova(columns),
        };
        match result {
            Ok(analysis) => Ok(Outcome::Completed(Box::new(analysis))),
            Err(err) => {
                let abort = err.downcast::<Abort>()?;
                tracing::debug!(%abort, "test aborted");
                report::write_error(&mut *self.out, &abort)?;
                Ok(Outcome::Aborted(abort))
            }
        }
    }

    /// All active rows when the grouping column has two labels, or the rows
    /// of the two labels the user picks when it has more.
    fn two_group_view(
        &mut self,
        grouping: usize,
        test: TestSelection,
    ) -> anyhow::Result<DatasetView<'a>> {
        let view = self.dataset.view();
        let labels = view.distinct_labels(grouping);
        match labels.len() {
            2 => Ok(view),
            found if found > 2 => {
                let names = labels.iter().map(ToString::to_string).collect::<Vec<_>>();
                let [first, second] = prompt::choose_two(
                    &mut *self.prompter,
                    "Select exactly 2 groups to compare:",
                    &names,
                )?;
                let selected = [labels[first].clone(), labels[second].clone()];
                tracing::info!(first = %selected[0], second = %selected[1], "groups selected");
                Ok(view.filter_labels(grouping, &selected))
            }
            found => Err(Abort::GroupCount {
                test,
                expected: 2,
                found,
            }
            .into()),
        }
    }

    fn independent(&mut self, columns: ColumnChoice) -> anyhow::Result<Analysis> {
        let selection = TestSelection::TTest(TTestKind::Independent);
        let view = self.two_group_view(columns.grouping, selection)?;
        let groups =
            extract_groups(&view, columns.dependent, columns.grouping).map_err(Abort::Data)?;
        let [first, second] = &groups[..] else {
            return Err(Abort::GroupCount {
                test: selection,
                expected: 2,
                found: groups.len(),
            }
            .into());
        };

        report::write_sample_summaries(
            &mut *self.out,
            &[
                (&first.label, first.values.as_slice()),
                (&second.label, second.values.as_slice()),
            ],
        )?;
        ensure_observed(&groups)?;
        let result = ttest::independent(&first.values, &second.values).map_err(Abort::Stats)?;
        tracing::debug!(t = result.statistic, p = result.p_value, "independent t-test");
        report::write_t_test(&mut *self.out, &result)?;

        Ok(Analysis {
            selection,
            samples: Samples::Groups(groups),
            statistic: Statistic::TTest(result),
            post_hoc: None,
        })
    }

    fn paired(&mut self, columns: ColumnChoice) -> anyhow::Result<Analysis> {
        let selection = TestSelection::TTest(TTestKind::Paired);
        let view = self.two_group_view(columns.grouping, selection)?;
        let labels = view.distinct_labels(columns.grouping);
        let found = labels.len();
        let Ok(conditions) = <[GroupLabel; 2]>::try_from(labels) else {
            return Err(Abort::GroupCount {
                test: selection,
                expected: 2,
                found,
            }
            .into());
        };

        let names = self.dataset.column_names();
        let subject = prompt::choose_column(
            &mut *self.prompter,
            "Choose subject identifier column:",
            &names,
        )?;
        let pairing = PairingColumns {
            subject,
            condition: columns.grouping,
            dependent: columns.dependent,
        };
        let pairs = pivot_pairs(&view, pairing, conditions).map_err(Abort::Data)?;
        if let Alignment::Truncated { first, second } = pairs.alignment {
            tracing::warn!(first, second, kept = pairs.len(), "paired columns truncated");
            report::write_warning(
                &mut *self.out,
                format_args!(
                    "{} has {first} values and {} has {second}; both truncated to the first {} by position.",
                    pairs.conditions[0],
                    pairs.conditions[1],
                    pairs.len()
                ),
            )?;
        }

        report::write_sample_summaries(
            &mut *self.out,
            &[
                (&pairs.conditions[0], pairs.first.as_slice()),
                (&pairs.conditions[1], pairs.second.as_slice()),
            ],
        )?;
        let result = ttest::paired(&pairs.first, &pairs.second).map_err(Abort::Stats)?;
        tracing::debug!(t = result.statistic, p = result.p_value, "paired t-test");
        report::write_t_test(&mut *self.out, &result)?;

        Ok(Analysis {
            selection,
            samples: Samples::Paired(pairs),
            statistic: Statistic::TTest(result),
            post_hoc: None,
        })
    }

    fn one_sample(&mut self, columns: ColumnChoice) -> anyhow::Result<Analysis> {
        let population_mean =
            prompt::read_decimal(&mut *self.prompter, "Enter the value to test against:")?;
        let values = self
            .dataset
            .view()
            .observed_values(columns.dependent)
            .map_err(Abort::Data)?;

        let name = self.dataset.column(columns.dependent).name();
        report::write_sample_summaries(&mut *self.out, &[(name, values.as_slice())])?;
        let result = ttest::one_sample(&values, population_mean).map_err(Abort::Stats)?;
        tracing::debug!(
            mu = population_mean,
            t = result.statistic,
            p = result.p_value,
            "one-sample t-test"
        );
        report::write_t_test(&mut *self.out, &result)?;

        Ok(Analysis {
            selection: TestSelection::TTest(TTestKind::OneSample),
            samples: Samples::Single {
                population_mean,
                values,
            },
            statistic: Statistic::TTest(result),
            post_hoc: None,
        })
    }

    fn anova(&mut self, columns: ColumnChoice) -> anyhow::Result<Analysis> {
        let groups = extract_groups(&self.dataset.view(), columns.dependent, columns.grouping)
            .map_err(Abort::Data)?;
        let summaries = groups
            .iter()
            .map(|g| (&g.label, g.values.as_slice()))
            .collect::<Vec<_>>();
        report::write_sample_summaries(&mut *self.out, &summaries)?;
        ensure_observed(&groups)?;

        let anova = OneWayAnova::new(&value_slices(&groups)).map_err(Abort::Stats)?;
        tracing::debug!(f = anova.f_statistic, p = anova.p_value, "one-way ANOVA");
        report::write_anova(&mut *self.out, &anova)?;

        let alpha = self.settings.alpha;
        let post_hoc = if anova.p_value < alpha {
            Some(post_hoc::run(
                &mut *self.prompter,
                &mut *self.out,
                &groups,
                alpha,
            )?)
        } else {
            tracing::info!(p = anova.p_value, alpha, "not significant, skipping post-hoc");
            None
        };

        Ok(Analysis {
            selection: TestSelection::Anova,
            samples: Samples::Groups(groups),
            statistic: Statistic::Anova(anova),
            post_hoc,
        })
    }
}

/// Fails on the first group left without observations, naming it by label.
fn ensure_observed(groups: &[Group]) -> Result<(), Abort> {
    match groups.iter().find(|g| g.values.is_empty()) {
        Some(group) => Err(Abort::EmptyGroup {
            label: group.label.clone(),
        }),
        None => Ok(()),
    }
}
