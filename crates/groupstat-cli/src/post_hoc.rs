use std::io::Write;

use groupstat_data::groups::{Group, value_slices};
use groupstat_stats::{
    correction::{self, PairwiseComparison},
    tukey::TukeyHsd,
};

use crate::{
    prompt::{self, Choice, Prompter},
    report,
    session::Abort,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub(crate) enum PostHocMethod {
    #[display("Tukey HSD")]
    TukeyHsd,
    #[display("Bonferroni-corrected pairwise t-tests")]
    Bonferroni,
}

impl Choice for PostHocMethod {
    const ALL: &'static [Self] = &[PostHocMethod::TukeyHsd, PostHocMethod::Bonferroni];
}

/// Pairwise comparisons following a significant ANOVA.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PostHoc {
    Tukey(TukeyHsd),
    Bonferroni(Vec<PairwiseComparison>),
}

/// Asks which post-hoc method to use, runs it on `groups` and prints the result.
pub(crate) fn run<P, W>(
    prompter: &mut P,
    out: &mut W,
    groups: &[Group],
    alpha: f64,
) -> anyhow::Result<PostHoc>
where
    P: Prompter + ?Sized,
    W: Write + ?Sized,
{
    let method = prompt::choose::<PostHocMethod, _>(prompter, "Choose post-hoc test:")?;
    tracing::info!(%method, alpha, "running post-hoc comparisons");

    let slices = value_slices(groups);
    let labels = groups.iter().map(|g| g.label.clone()).collect::<Vec<_>>();
    let post_hoc = match method {
        PostHocMethod::TukeyHsd => {
            let hsd = TukeyHsd::new(&slices, alpha).map_err(Abort::Stats)?;
            report::write_tukey(out, &hsd, &labels)?;
            PostHoc::Tukey(hsd)
        }
        PostHocMethod::Bonferroni => {
            let comparisons =
                correction::bonferroni_pairwise(&slices, alpha).map_err(Abort::Stats)?;
            report::write_bonferroni(out, &comparisons, &labels)?;
            PostHoc::Bonferroni(comparisons)
        }
    };
    Ok(post_hoc)
}

#[cfg(test)]
mod tests {
    use groupstat_data::cell::GroupLabel;

    use super::*;
    use crate::prompt::script::{Answer, ScriptedPrompter};

    fn groups(values: &[&[f64]]) -> Vec<Group> {
        values
            .iter()
            .zip(["a", "b", "c", "d"])
            .map(|(values, label)| Group {
                label: GroupLabel::from(label),
                values: values.to_vec(),
            })
            .collect()
    }

    #[test]
    fn test_bonferroni_reports_every_pair() {
        let groups = groups(&[
            &[1.0, 2.0, 3.0],
            &[4.0, 5.0, 6.0],
            &[7.0, 8.0, 9.0],
            &[2.0, 4.0, 3.0],
        ]);
        let mut prompter = ScriptedPrompter::new([Answer::Select(1)]);
        let mut out = Vec::new();

        let post_hoc = run(&mut prompter, &mut out, &groups, 0.05).unwrap();
        let PostHoc::Bonferroni(comparisons) = post_hoc else {
            panic!("expected Bonferroni comparisons");
        };
        assert_eq!(comparisons.len(), 6);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().filter(|l| l.contains(" vs ")).count(), 6);
        assert!(text.contains("a vs d: "));
    }

    #[test]
    fn test_tukey_prints_table() {
        let groups = groups(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
        let mut prompter = ScriptedPrompter::new([Answer::Select(0)]);
        let mut out = Vec::new();

        let post_hoc = run(&mut prompter, &mut out, &groups, 0.05).unwrap();
        assert!(matches!(post_hoc, PostHoc::Tukey(ref hsd) if hsd.comparisons.len() == 3));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Tukey HSD"));
        assert_eq!(prompter.prompts, ["Choose post-hoc test:"]);
    }

    #[test]
    fn test_statistical_failure_is_an_abort() {
        let groups = groups(&[&[1.0, 2.0], &[]]);
        let mut prompter = ScriptedPrompter::new([Answer::Select(1)]);
        let mut out = Vec::new();

        let err = run(&mut prompter, &mut out, &groups, 0.05).unwrap_err();
        assert!(matches!(err.downcast_ref::<Abort>(), Some(Abort::Stats(_))));
    }
}
