use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// CLI arguments for refsuggest
#[derive(Debug, Parser)]
#[command(
    name = "refsuggest",
    version,
    about = "Inspect reference datasets and drive the autocomplete engine from a terminal"
)]
pub struct CliArgs {
    /// Dataset kind stored at the source
    #[arg(short = 'k', long = "kind", value_enum, default_value_t = Kind::Location, global = true)]
    pub kind: Kind,

    /// Dataset URL or path; `{partition}` is replaced by the partition key
    /// (default: $REFSUGGEST_DATASET_URL)
    #[arg(short = 's', long = "source", global = true)]
    pub source: Option<String>,

    /// Partition to load (e.g. us, europe, asia)
    #[arg(short = 'p', long = "partition", global = true)]
    pub partition: Option<String>,

    /// Restrict location results to this country (code or name)
    #[arg(short = 'c', long = "country", global = true)]
    pub country: Option<String>,

    /// Maximum number of suggestions
    #[arg(short = 'l', long = "limit", global = true)]
    pub limit: Option<usize>,

    /// Match threshold, 0.0 (exact) to 1.0 (anything)
    #[arg(short = 't', long = "threshold", global = true)]
    pub threshold: Option<f64>,

    /// Debounce delay for sessions, in milliseconds
    #[arg(long = "debounce-ms", global = true)]
    pub debounce_ms: Option<u64>,

    /// IP geolocation endpoint (default: $REFSUGGEST_GEO_URL or ipapi.co)
    #[arg(long = "geo-url", global = true)]
    pub geo_url: Option<String>,

    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    /// Colleges / universities (`name`, `country`)
    Institution,
    /// Postal codes (`zip`, `city`, `state`, `country`)
    Location,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show record and country counts of a partition
    Stats,

    /// List the known partitions and the countries mapped to them
    Partitions,

    /// List the countries present in a partition
    Countries,

    /// Detect the partition for this machine via IP geolocation
    Resolve,

    /// Rank the records of a partition against a query
    Search {
        /// Text as typed by the user
        query: String,

        /// Print the committed payloads as JSON instead of dropdown labels
        #[arg(long)]
        json: bool,
    },

    /// Replay a scripted interaction against a live widget
    ///
    /// Steps: focus, blur, type:<text>, wait:<ms>, down, up, enter, esc,
    /// click:<index>, country:<name|code>, partition:<key>
    Session {
        /// Detect the partition via IP geolocation
        #[arg(long)]
        detect: bool,

        #[arg(required = true)]
        steps: Vec<String>,
    },
}
