//! Command line tool to convert between POSCAR and CIF files
//!
//! Every input file is converted independently into the other format. The
//! input format is picked from the file name unless `--from` is given.
//!
//! # Usage
//!
//! ```text
//! Usage: cellconv <files>... [options]
//! ```
//!
//! Help is printed with the `-h` flag, and `--help` will show examples, default
//! values, and any important behaviour.
//!
//! ## Options
//!
//! By default each file is written next to the current directory as
//! `<stem>.cif` or `<stem>.vasp`.
//!
//! ### > How to convert files
//!
//! ```bash
//! # POSCAR to CIF, writes 'GaAs.cif'
//! cellconv GaAs.vasp
//!
//! # CIF to POSCAR, writes 'NaCl.vasp'
//! cellconv NaCl.cif
//!
//! # Any mix of files at once
//! cellconv POSCAR NaCl.cif structures/*.vasp
//! ```
//!
//! ### > How to change where output goes
//!
//! ```bash
//! # Write into an existing directory
//! cellconv *.cif --dir converted/
//!
//! # Choose the output name for a single file
//! cellconv CONTCAR --output relaxed
//!
//! # Print to the terminal instead of writing files
//! cellconv NaCl.cif --stdout
//! ```
//!
//! ### > How to handle unusual files
//!
//! ```bash
//! # File name gives no hint of the format
//! cellconv structure.txt --from poscar
//!
//! # Fail rather than write an empty POSCAR for a CIF without atoms
//! cellconv empty.cif --strict
//! ```
//!

// standard libraries
use std::path::{Path, PathBuf};

// crate modules
use cellconv::convert::{read_structure, write_structure};
use cellconv::utils::f;
use cellconv::writers::write_text;
use cellconv::{output_stem, Format};

// external crates
use anyhow::{anyhow, bail, Context, Result};
use clap::{arg, Parser, ValueEnum};
use log::*;

#[doc(hidden)]
fn main() -> Result<()> {
    // set up the command line interface and match arguments
    let cli: Cli = Cli::parse();

    // set up logging (+2 to make 'Info' the default)
    let verbosity = cli.verbose as usize + 2;
    logging_init(verbosity, cli.quiet);

    if cli.output.is_some() && cli.files.len() > 1 {
        bail!("--output can only be used with a single input file");
    }

    // each file is independent, so keep going after a failure
    let mut failed = 0;
    for file in &cli.files {
        if let Err(e) = convert_file(file, &cli) {
            error!("Failed to convert \"{file}\": {e:#}");
            failed += 1;
        }
    }

    match failed {
        0 => Ok(()),
        n => Err(anyhow!("{n} of {} files failed to convert", cli.files.len())),
    }
}

/// Convert between POSCAR and CIF structure files
///
/// Each input is converted into the other format. POSCAR files become
/// CIF, and CIF files become POSCAR. The input format is inferred from
/// the file name unless --from is given.
///
/// Examples
/// --------
///
///  Typical use
///     $ cellconv GaAs.vasp NaCl.cif
///
///  Put the output somewhere else
///     $ cellconv *.cif --dir converted/
///
///  Print to the terminal
///     $ cellconv NaCl.cif --stdout
///
///  Force the input format
///     $ cellconv structure.txt --from poscar
///
/// Notes
/// -----
///
/// Recognised file names:
///   - CIF: *.cif
///   - POSCAR: *.vasp, *.poscar, POSCAR*, CONTCAR*
///
/// CIF cell angles are not read. A POSCAR written from a CIF always
/// has an orthogonal lattice built from the cell lengths alone.
///
/// POSCAR coordinates are always taken as fractional (Direct).
#[doc(hidden)]
#[derive(Parser)]
#[command(
    verbatim_doc_comment,
    arg_required_else_help(true),
    before_help(banner()),
    after_help("Typical use: cellconv GaAs.vasp NaCl.cif\n\nNOTE: --help shows more detail and examples"),
    term_width(70),
    hide_possible_values(true),
    override_usage("cellconv <files>... [options]")
)]
struct Cli {
    // * Positional
    /// Paths to POSCAR or CIF files
    #[arg(name = "files", required = true)]
    files: Vec<String>,

    // * Optional
    /// Input format, if it can not be told from the name
    ///
    /// By default the format is inferred from the file name. Use this to
    /// treat every input as the given format:
    ///     > poscar
    ///     > cif
    #[arg(help_heading("Conversion options"))]
    #[arg(short, long, value_enum)]
    #[arg(verbatim_doc_comment)]
    #[arg(value_name = "format")]
    from: Option<CliFormat>,

    /// Reject CIF files with no atom sites
    ///
    /// By default a CIF with cell data but no atom sites is converted to a
    /// POSCAR with empty species and coordinate sections. With --strict this
    /// is treated as an error instead.
    #[arg(help_heading("Conversion options"))]
    #[arg(long)]
    strict: bool,

    /// Name of output file (excl. extension)
    ///
    /// Only valid for a single input. Defaults to the input file stem and
    /// will automatically set the relevant extension.
    #[arg(help_heading("Output options"))]
    #[arg(short, long)]
    #[arg(value_name = "name")]
    output: Option<String>,

    /// Directory for output files
    ///
    /// Defaults to the current directory. The directory must already exist.
    #[arg(help_heading("Output options"))]
    #[arg(short, long)]
    #[arg(value_name = "path")]
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Print converted text instead of writing files
    #[arg(help_heading("Output options"))]
    #[arg(long)]
    #[arg(conflicts_with = "json")]
    stdout: bool,

    /// Also write the parsed structure as JSON
    ///
    /// Writes `<name>.json` alongside the converted file, which is handy for
    /// checking exactly what was read.
    #[arg(help_heading("Output options"))]
    #[arg(short, long)]
    json: bool,

    // * Flags
    /// Verbose logging (-v, -vv)
    ///
    /// If specified, the default log level of INFO is increased to DEBUG (-v)
    /// or TRACE (-vv). Errors and Warnings are always logged unless in quiet
    /// (-q) mode.
    #[arg(short, long)]
    #[arg(action = clap::ArgAction::Count)]
    verbose: u8,

    /// Supress all log output (overrules --verbose)
    #[arg(short, long)]
    quiet: bool,
}

// Wrapper for the library formats
#[doc(hidden)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum CliFormat {
    Poscar,
    Cif,
}

impl From<CliFormat> for Format {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Poscar => Format::Poscar,
            CliFormat::Cif => Format::Cif,
        }
    }
}

/// Sets up logging at runtime to allow for multiple verbosity levels
#[doc(hidden)]
fn logging_init(verbosity: usize, quiet: bool) {
    stderrlog::new()
        .modules(vec![module_path!()])
        .quiet(quiet)
        .verbosity(verbosity)
        .show_level(false)
        .color(stderrlog::ColorChoice::Never)
        .timestamp(stderrlog::Timestamp::Off)
        .init()
        .unwrap();
}

/// Creates a banner for the command line
#[doc(hidden)]
fn banner() -> String {
    let mut s = f!("{:-<1$}\n", "", 70);
    s += &f!("{:^70}\n", "Cellconv :: POSCAR <-> CIF");
    s += &f!("{:-<1$}", "", 70);
    s
}

#[doc(hidden)]
/// Read, convert, and write a single file
fn convert_file(file: &str, cli: &Cli) -> Result<()> {
    let path = Path::new(file);
    let source = input_format(path, cli)?;
    let target = source.target();
    info!("Converting \"{file}\" ({source} -> {target})");

    let text = std::fs::read_to_string(path).with_context(|| f!("Could not open {file}"))?;
    let structure = read_structure(&text, source, cli.strict)?;
    debug!("{structure}");

    // nothing is written unless the conversion as a whole succeeded
    let output = write_structure(&structure, target)?;

    if cli.stdout {
        print!("{output}");
        if !output.ends_with('\n') {
            println!();
        }
        return Ok(());
    }

    let stem = match &cli.output {
        Some(name) => name.clone(),
        None => output_stem(Some(path), &text, source),
    };

    let mut outputs = vec![(cli.dir.join(f!("{stem}.{}", target.extension())), output)];
    if cli.json {
        let json = serde_json::to_string_pretty(&structure)?;
        outputs.push((cli.dir.join(f!("{stem}.json")), json));
    }

    write_all(&outputs)
}

#[doc(hidden)]
/// Write every output file, removing the ones already written if any fails
fn write_all(outputs: &[(PathBuf, String)]) -> Result<()> {
    for (n, (path, text)) in outputs.iter().enumerate() {
        if let Err(e) = write_text(text, path) {
            for (written, _) in &outputs[..n] {
                if let Err(cleanup) = std::fs::remove_file(written) {
                    warn!("Could not remove \"{}\": {cleanup}", written.display());
                }
            }
            return Err(e);
        }
        info!("  - {}", path.display());
    }
    Ok(())
}

#[doc(hidden)]
/// Format from --from, otherwise from the file name
fn input_format(path: &Path, cli: &Cli) -> Result<Format> {
    if let Some(format) = cli.from {
        return Ok(format.into());
    }

    let format = Format::from_path(path).ok_or_else(|| {
        anyhow!(
            "Unable to infer the format of \"{}\", use --from",
            path.display()
        )
    })?;
    trace!("Inferred {format} from \"{}\"", path.display());
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_write_leaves_no_output_behind() {
        let dir = std::env::temp_dir().join(f!("cellconv-write-all-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("blocked.json")).unwrap();

        let outputs = vec![
            (dir.join("blocked.cif"), "data_blocked".to_string()),
            (dir.join("blocked.json"), "{}".to_string()),
        ];
        assert!(write_all(&outputs).is_err());
        assert!(!dir.join("blocked.cif").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn every_output_is_written() {
        let dir = std::env::temp_dir().join(f!("cellconv-write-ok-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let outputs = vec![
            (dir.join("ok.vasp"), "ok\n".to_string()),
            (dir.join("ok.json"), "{}".to_string()),
        ];
        write_all(&outputs).unwrap();
        assert_eq!(std::fs::read_to_string(dir.join("ok.vasp")).unwrap(), "ok\n");
        assert!(dir.join("ok.json").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
