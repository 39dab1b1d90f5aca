use std::path::PathBuf;

use clap::Parser;

/// emx-rank - Rank Zettelkasten notes by wiki-link connectivity
///
/// # Quick Reference
///
/// ## Analyze a vault
///
/// ```bash
/// emx-rank -i ~/vault -o links.csv              # CSV of every note, best linked first
/// emx-rank -i ~/vault -o links.csv -r           # Include subdirectories
/// emx-rank -i ~/vault --no-csv --json           # JSON summary on stdout only
/// ```
///
/// ## Tag filters
///
/// ```bash
/// emx-rank -i ~/vault -o out.csv --select-tags rust book   # Notes with #rust AND #book
/// emx-rank -i ~/vault -o out.csv --ignore-tags draft       # Skip notes tagged #draft
/// ```
///
/// ## Select and copy
///
/// ```bash
/// emx-rank -i ~/vault -o out.csv --copy-top 20 --copy-dest ./best
/// emx-rank -i ~/vault -o out.csv --copy-top-percent 10 --copy-until-size 2 --copy-dest ./best
/// emx-rank -i ~/vault --no-csv --copy-top 50 --combine-md all.md
/// ```
///
/// When several limits are given, the most restrictive one wins. Any limit
/// needs somewhere to put the selection: --copy-dest, --combine-md, or both.
///
/// ## Which files count as notes
///
/// Files ending in `.md` (or the configured `extension`) directly inside the
/// input directory; with -r, subdirectories too. Hidden files and hidden
/// directories (name starting with `.`) are always skipped.
///
/// ## Dry run
///
/// ```bash
/// emx-rank -i ~/vault -o out.csv --copy-top 5 --copy-dest ./best --dry-run -v
/// ```
///
/// ## Environment Variables
///
/// - `EMX_RANK_CONFIG`: Config file path (default: <config dir>/emx-rank/config.yaml)
/// - `RUST_LOG`: Log filter, overrides --verbose
///
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "emx-rank")]
#[command(version = "0.1.0")]
#[command(about = "Rank Zettelkasten notes by wiki-link connectivity")]
pub struct Cli {
    /// Directory containing the .md notes
    #[arg(short = 'i', long = "input-dir", alias = "input_dir", value_name = "DIR")]
    pub input_dir: PathBuf,

    /// CSV file to write (required unless --no-csv)
    #[arg(short = 'o', long = "output-csv", alias = "output_csv", value_name = "FILE")]
    pub output_csv: Option<PathBuf>,

    /// Tags to ignore (a note with any of these is excluded)
    #[arg(long, num_args = 0.., value_name = "TAG")]
    pub ignore_tags: Vec<String>,

    /// Tags to select (a note must have all of these)
    #[arg(long, num_args = 0.., value_name = "TAG")]
    pub select_tags: Vec<String>,

    /// Select at most the N most linked notes
    #[arg(long, value_name = "N")]
    pub copy_top: Option<usize>,

    /// Select at most P% of the admissible notes, in (0, 100]
    #[arg(long, value_name = "PERCENT")]
    pub copy_top_percent: Option<f64>,

    /// Select notes in rank order until X MB total size
    #[arg(long, value_name = "MB")]
    pub copy_until_size: Option<f64>,

    /// Destination folder for copying the selected notes
    /// (a limit needs this or --combine-md)
    #[arg(long, value_name = "DIR")]
    pub copy_dest: Option<PathBuf>,

    /// Combine the selected notes into one .md file, separated by a blank line
    /// (can stand in for --copy-dest)
    #[arg(long, value_name = "FILE")]
    pub combine_md: Option<PathBuf>,

    /// Scan subdirectories too (hidden files and directories are always skipped)
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Do not generate CSV output
    #[arg(long)]
    pub no_csv: bool,

    /// Perform a trial run with no changes made (no CSV, no copy, no combine)
    #[arg(long)]
    pub dry_run: bool,

    /// Show progress and debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Print a JSON summary of the run to stdout
    #[arg(short = 'j', long)]
    pub json: bool,

    /// Config file (default: $EMX_RANK_CONFIG or <config dir>/emx-rank/config.yaml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_long_help_states_destination_and_hidden_policy() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("a limit needs this or --combine-md"));
        assert!(help.contains("can stand in for --copy-dest"));
        assert!(help.contains("hidden files and directories are always skipped"));
    }

    #[test]
    fn test_parse_full() {
        let cli = Cli::try_parse_from([
            "emx-rank",
            "-i",
            "vault",
            "-o",
            "out.csv",
            "--select-tags",
            "a",
            "#b",
            "--ignore-tags",
            "draft",
            "--copy-top",
            "5",
            "--copy-top-percent",
            "12.5",
            "--copy-until-size",
            "1.5",
            "--copy-dest",
            "best",
            "--dry-run",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.input_dir, PathBuf::from("vault"));
        assert_eq!(cli.output_csv, Some(PathBuf::from("out.csv")));
        assert_eq!(cli.select_tags, vec!["a", "#b"]);
        assert_eq!(cli.ignore_tags, vec!["draft"]);
        assert_eq!(cli.copy_top, Some(5));
        assert_eq!(cli.copy_top_percent, Some(12.5));
        assert_eq!(cli.copy_until_size, Some(1.5));
        assert_eq!(cli.copy_dest, Some(PathBuf::from("best")));
        assert!(cli.dry_run && cli.verbose);
        assert!(!cli.no_csv && !cli.recursive && !cli.json);
    }

    #[test]
    fn test_input_dir_required() {
        assert!(Cli::try_parse_from(["emx-rank", "--no-csv"]).is_err());
    }

    #[test]
    fn test_underscore_aliases() {
        let cli = Cli::try_parse_from(["emx-rank", "--input_dir", "v", "--output_csv", "o.csv"]).unwrap();
        assert_eq!(cli.input_dir, PathBuf::from("v"));
        assert_eq!(cli.output_csv, Some(PathBuf::from("o.csv")));
    }
}
