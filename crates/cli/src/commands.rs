use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Translate an HQL query into an aggregate command
    Translate {
        #[arg(long, help = "Entity schema file path (JSON)")]
        schema: String,

        #[arg(long, help = "HQL query, e.g. \"from Book b where b.price > 10\"")]
        query: String,

        #[arg(long, help = "Render numbers and dates in canonical extended JSON")]
        canonical: bool,

        #[arg(long, help = "Print the command on a single line")]
        compact: bool,

        #[arg(
            long,
            help = "If specified, writes the command to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Show the filter of a query before and after null-safety enforcement
    Explain {
        #[arg(long, help = "Entity schema file path (JSON)")]
        schema: String,

        #[arg(long, help = "HQL query")]
        query: String,

        #[arg(long, help = "Render numbers and dates in canonical extended JSON")]
        canonical: bool,
    },
    /// Print the parsed HQL syntax tree
    Ast {
        #[arg(long, help = "HQL query")]
        query: String,
    },
}
