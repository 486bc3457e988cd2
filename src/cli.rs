use env_logger::Env;
use snofam::{GroupOptions, SnoType};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "snofam",
    about = "Groups CD-box snoRNAs into families sharing the same D-box interaction region"
)]
pub(crate) struct Opt {
    #[structopt(
        long,
        help = "Input table in tab format (20 columns, no header, may be gzipped)",
        parse(from_os_str)
    )]
    pub input: PathBuf,
    #[structopt(
        long,
        help = "Write families to this file instead of standard output",
        parse(from_os_str)
    )]
    pub output: Option<PathBuf>,
    #[structopt(
        long = "type",
        help = "Type of snoRNA",
        possible_values = &SnoType::VARIANTS
    )]
    pub sno_type: SnoType,
    #[structopt(
        long = "switch-boxes",
        help = "If the D-box is located wrongly try the C-box annotation as D-box"
    )]
    pub switch_boxes: bool,
    #[structopt(
        long,
        help = "Length of interaction element (seed) to be extracted",
        default_value = "20",
        parse(try_from_str = parse_length)
    )]
    pub length: usize,
    #[structopt(short, long, help = "Be loud, report start and finish times")]
    pub verbose: bool,
}

impl Opt {
    /// Warnings for skipped records are always shown, `-v` adds progress and timing
    pub(crate) fn set_logging(&self) {
        let level = if self.verbose { "info" } else { "warn" };
        env_logger::Builder::from_env(Env::default().default_filter_or(level))
            .format_timestamp_secs()
            .init();
    }

    pub(crate) fn group_options(&self) -> GroupOptions {
        GroupOptions {
            length: self.length,
            switch_boxes: self.switch_boxes,
        }
    }
}

fn parse_length(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err(String::from("seed length must be at least 1")),
        Ok(length) => Ok(length),
        Err(e) => Err(format!("{}: {}", value, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opt = Opt::from_iter(&["snofam", "--input", "in.tsv", "--type", "CD"]);

        assert_eq!(opt.sno_type, SnoType::Cd);
        assert_eq!(opt.group_options(), GroupOptions::default());
        assert!(opt.output.is_none());
        assert!(!opt.verbose);
    }

    #[test]
    fn all_flags() {
        let opt = Opt::from_iter(&[
            "snofam",
            "-v",
            "--input",
            "in.tsv",
            "--output",
            "out.txt",
            "--type",
            "HACA",
            "--switch-boxes",
            "--length",
            "12",
        ]);

        assert_eq!(opt.sno_type, SnoType::Haca);
        assert_eq!(opt.output, Some(PathBuf::from("out.txt")));
        assert_eq!(
            opt.group_options(),
            GroupOptions {
                length: 12,
                switch_boxes: true
            }
        );
        assert!(opt.verbose);
    }

    #[test]
    fn zero_length_rejected() {
        let opt = Opt::from_iter_safe(&[
            "snofam", "--input", "in.tsv", "--type", "CD", "--length", "0",
        ]);
        assert!(opt.is_err());
    }
}
