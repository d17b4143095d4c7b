use clap::Parser;

/// This is a ranked voting tabulation program for small fixed slates.
/// It runs a set of built-in illustrative elections with the instant-runoff
/// algorithm and prints the winner or elimination report of each round.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (scenario name or empty) Runs a single built-in scenario instead of
    /// the whole demonstration set. Unknown names list the available
    /// scenarios in the error message.
    #[clap(short, long, value_parser)]
    pub scenario: Option<String>,

    /// (integer or empty) Seeds the tie-break generator so that runs with
    /// tied candidates are reproducible. Without a seed, ties are broken with
    /// the system random source.
    #[clap(long, value_parser)]
    pub seed: Option<u64>,

    /// (file path, 'stdout' or empty) If specified, the summary of all the
    /// elections will be written in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) A reference file containing the expected summary
    /// in JSON format. If provided, rcvtally will check that the tabulated
    /// output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// If passed as an argument, will turn on verbose logging and the
    /// per-round dump of the slate and the preference columns.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
