use std::io::{stdout, IsTerminal};

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner for the open-ended convergence loop. Hidden when stdout is not a
/// terminal so piped output stays clean.
pub fn iteration_bar(msg: &str) -> Option<ProgressBar> {
    if !stdout().is_terminal() {
        return None;
    }

    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} [{elapsed_precise}] iteration {pos} {msg}")
            .unwrap()
    );
    bar.set_message(msg.to_string());

    Some(bar)
}
