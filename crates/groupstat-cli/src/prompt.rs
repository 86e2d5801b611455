//! Interactive prompts.
//!
//! Every question the program asks goes through [`Prompter`], so the
//! dispatcher can run against a terminal or against a scripted sequence of
//! answers. Re-prompt loops (exactly two labels, decimal input) live in the
//! free functions here rather than in a particular prompter.

use std::fmt;

use anyhow::Context as _;
use dialoguer::{Input, MultiSelect, Select, theme::ColorfulTheme};

/// Source of user answers.
pub(crate) trait Prompter {
    /// Asks for one of `items` and returns its index.
    fn select(&mut self, prompt: &str, items: &[String]) -> anyhow::Result<usize>;

    /// Asks for any number of `items` and returns the chosen indices.
    fn select_many(&mut self, prompt: &str, items: &[String]) -> anyhow::Result<Vec<usize>>;

    /// Asks for a line of free text.
    fn read_text(&mut self, prompt: &str) -> anyhow::Result<String>;

    /// Tells the user why an answer was rejected.
    fn notify(&mut self, message: &str);

    /// Waits until the user acknowledges `prompt`.
    fn pause(&mut self, prompt: &str) -> anyhow::Result<()>;
}

/// A decision point whose answers are the variants of an enum.
pub(crate) trait Choice: Copy + fmt::Display + 'static {
    /// Every variant, in the order they are offered.
    const ALL: &'static [Self];
}

/// Offers every variant of `T` and returns the one picked.
pub(crate) fn choose<T, P>(prompter: &mut P, prompt: &str) -> anyhow::Result<T>
where
    T: Choice,
    P: Prompter + ?Sized,
{
    let labels = T::ALL.iter().map(ToString::to_string).collect::<Vec<_>>();
    let index = prompter.select(prompt, &labels)?;
    T::ALL
        .get(index)
        .copied()
        .with_context(|| format!("Selection {index} out of range for {prompt:?}"))
}

/// Asks for one column by name and returns its index.
pub(crate) fn choose_column<P>(
    prompter: &mut P,
    prompt: &str,
    names: &[String],
) -> anyhow::Result<usize>
where
    P: Prompter + ?Sized,
{
    let index = prompter.select(prompt, names)?;
    anyhow::ensure!(
        index < names.len(),
        "Selection {index} out of range for {prompt:?}"
    );
    Ok(index)
}

/// Asks for exactly two of `items`, re-prompting until the user picks two.
pub(crate) fn choose_two<P>(
    prompter: &mut P,
    prompt: &str,
    items: &[String],
) -> anyhow::Result<[usize; 2]>
where
    P: Prompter + ?Sized,
{
    loop {
        let mut picked = prompter.select_many(prompt, items)?;
        picked.sort_unstable();
        picked.dedup();
        if let [first, second] = picked[..]
            && second < items.len()
        {
            return Ok([first, second]);
        }
        tracing::debug!(picked = picked.len(), "rejected group selection");
        prompter.notify("Please select exactly 2 groups.");
    }
}

/// Asks for a decimal number, re-prompting until [`is_decimal_literal`] accepts the input.
pub(crate) fn read_decimal<P>(prompter: &mut P, prompt: &str) -> anyhow::Result<f64>
where
    P: Prompter + ?Sized,
{
    loop {
        let text = prompter.read_text(prompt)?;
        if is_decimal_literal(&text)
            && let Ok(value) = text.parse::<f64>()
        {
            return Ok(value);
        }
        prompter.notify("Please enter a number (digits with an optional decimal point).");
    }
}

/// Whether `input` is an optional leading `-` followed by digits with at most
/// one decimal point (and at least one digit).
///
/// Whitespace, exponents, signs elsewhere and any other characters are rejected.
pub(crate) fn is_decimal_literal(input: &str) -> bool {
    let body = input.strip_prefix('-').unwrap_or(input);
    body.chars().all(|c| c.is_ascii_digit() || c == '.')
        && body.matches('.').count() <= 1
        && body.chars().any(|c| c.is_ascii_digit())
}

/// Prompter backed by the terminal.
pub(crate) struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub(crate) fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, items: &[String]) -> anyhow::Result<usize> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
            .with_context(|| format!("Failed to read answer to {prompt:?}"))
    }

    fn select_many(&mut self, prompt: &str, items: &[String]) -> anyhow::Result<Vec<usize>> {
        MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .interact()
            .with_context(|| format!("Failed to read answer to {prompt:?}"))
    }

    fn read_text(&mut self, prompt: &str) -> anyhow::Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .with_context(|| format!("Failed to read answer to {prompt:?}"))
    }

    fn notify(&mut self, message: &str) {
        eprintln!("{message}");
    }

    fn pause(&mut self, prompt: &str) -> anyhow::Result<()> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .report(false)
            .interact_text()
            .context("Failed to wait for Enter")?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::{
        script::{Answer, ScriptedPrompter},
        *,
    };

    #[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
    enum Fruit {
        #[display("Apple")]
        Apple,
        #[display("Pear")]
        Pear,
    }

    impl Choice for Fruit {
        const ALL: &'static [Self] = &[Fruit::Apple, Fruit::Pear];
    }

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_choose_maps_index_to_variant() {
        let mut prompter = ScriptedPrompter::new([Answer::Select(1)]);
        assert_eq!(choose::<Fruit, _>(&mut prompter, "Fruit?").unwrap(), Fruit::Pear);
    }

    #[test]
    fn test_choose_rejects_out_of_range_index() {
        let mut prompter = ScriptedPrompter::new([Answer::Select(2)]);
        assert!(choose::<Fruit, _>(&mut prompter, "Fruit?").is_err());
    }

    #[test]
    fn test_choose_two_reprompts_until_two() {
        let items = labels(&["a", "b", "c", "d"]);
        let mut prompter = ScriptedPrompter::new([
            Answer::Many(vec![0]),
            Answer::Many(vec![0, 1, 2]),
            Answer::Many(vec![]),
            Answer::Many(vec![3, 1]),
        ]);
        let picked = choose_two(&mut prompter, "Two?", &items).unwrap();
        assert_eq!(picked, [1, 3]);
        assert_eq!(prompter.prompts.len(), 4);
        assert_eq!(prompter.notices.len(), 3);
        assert!(prompter.is_exhausted());
    }

    #[test]
    fn test_choose_two_never_proceeds_with_wrong_count() {
        let items = labels(&["a", "b", "c"]);
        let mut prompter = ScriptedPrompter::new([Answer::Many(vec![0, 1, 2])]);
        // The script runs dry on the re-prompt instead of returning three labels.
        assert!(choose_two(&mut prompter, "Two?", &items).is_err());
        assert_eq!(prompter.notices, ["Please select exactly 2 groups."]);
    }

    #[test]
    fn test_decimal_literal() {
        for ok in ["0", "12", "3.5", ".5", "5.", "-2", "-0.25", "007"] {
            assert!(is_decimal_literal(ok), "{ok:?} should be accepted");
        }
        for bad in [
            "", ".", "-", "1.2.3", "1e3", "+1", "--1", "1-", " 1", "1 ", "abc", "1,5", "NaN", "inf",
        ] {
            assert!(!is_decimal_literal(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_read_decimal_reprompts() {
        let mut prompter = ScriptedPrompter::new([
            Answer::Text("ten".into()),
            Answer::Text("1.2.3".into()),
            Answer::Text("-4.5".into()),
        ]);
        assert_eq!(read_decimal(&mut prompter, "Value?").unwrap(), -4.5);
        assert_eq!(prompter.notices.len(), 2);
    }
}
