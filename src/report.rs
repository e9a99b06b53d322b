use crate::github::RepoCommits;
use chrono::NaiveDate;
use std::io::{self, Write};

/// Print the day's commit report: a header naming the date, then each
/// repository with its commits indented. Empty input prints only the
/// header.
pub fn print_summary<W: Write>(
    out: &mut W,
    groups: &[RepoCommits],
    date: NaiveDate,
) -> io::Result<()> {
    writeln!(
        out,
        "\nSummary of pushed commits for {}:",
        date.format("%Y-%m-%d")
    )?;

    for group in groups {
        writeln!(out, "\nRepository: {}", group.repository)?;
        for commit in &group.commits {
            writeln!(out, "  {}", commit)?;
        }
    }

    Ok(())
}
