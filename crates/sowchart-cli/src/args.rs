//! Command-line argument definitions for the Sowchart CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. The subcommand picks the action; the global options select
//! the configuration file, the product corpus and logging verbosity.

use clap::{Parser, Subcommand, ValueEnum};

use sowchart::filename::ExportFormat;

/// Command-line arguments for the Sowchart flowchart viewer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to a product corpus (TOML) replacing the bundled one
    #[arg(long, global = true)]
    pub corpus: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the available products
    List,

    /// Render a product's flowchart and print the resulting page
    Show {
        /// Product id
        product: String,
    },

    /// Render a product's flowchart and export it
    Export {
        /// Product id
        product: String,

        /// File format to export
        #[arg(short, long, value_enum, default_value_t = FormatArg::Svg)]
        format: FormatArg,

        /// Directory receiving the files (overrides `[export] output_dir`)
        #[arg(short, long)]
        out_dir: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Svg,
    Png,
    All,
}

impl FormatArg {
    pub fn formats(self) -> &'static [ExportFormat] {
        match self {
            Self::Svg => &[ExportFormat::Svg],
            Self::Png => &[ExportFormat::Png],
            Self::All => &[ExportFormat::Svg, ExportFormat::Png],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_with_global_options() {
        let args = Args::try_parse_from([
            "sowchart",
            "export",
            "nao",
            "--format",
            "all",
            "--out-dir",
            "out",
            "--log-level",
            "off",
        ])
        .unwrap();

        assert_eq!(args.log_level, "off");
        let Command::Export {
            product,
            format,
            out_dir,
        } = args.command
        else {
            panic!("expected export");
        };
        assert_eq!(product, "nao");
        assert_eq!(format.formats(), [ExportFormat::Svg, ExportFormat::Png]);
        assert_eq!(out_dir.as_deref(), Some("out"));
    }

    #[test]
    fn test_export_defaults_to_svg() {
        let args = Args::try_parse_from(["sowchart", "export", "login"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Export {
                format: FormatArg::Svg,
                out_dir: None,
                ..
            }
        ));
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Args::try_parse_from(["sowchart"]).is_err());
    }
}
