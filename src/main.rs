use clap::{Parser as ClapParser, Subcommand};
use infix_expr::cli::{self, CliError};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "infix")]
#[command(about = "Parse, evaluate, reduce and re-print infix expressions")]
#[command(version)]
struct Cli {
    /// Log parsing, dispatch and reduction steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression and print the result as JSON
    Eval {
        /// The expression to evaluate
        expression: String,

        /// Variable bindings as a JSON object (reads from stdin if not provided)
        #[arg(short, long)]
        bindings: Option<String>,
    },

    /// Partially evaluate an expression against the bindings that are known
    Reduce {
        /// The expression to reduce
        expression: String,

        /// Partial bindings as a JSON object (reads from stdin if not provided)
        #[arg(short, long)]
        bindings: Option<String>,

        /// Print the result as an SQL condition
        #[arg(long)]
        sql: bool,
    },

    /// Re-print an expression with minimal parentheses
    Print {
        expression: String,

        /// Print as an SQL condition
        #[arg(long)]
        sql: bool,
    },

    /// List the variables an expression references
    Vars {
        expression: String,

        /// Show the number of occurrences of each variable
        #[arg(long)]
        count: bool,
    },

    /// Show the tokens of an expression
    Tokens { expression: String },
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(io::stderr)
            .init();
    }

    let result = match cli.command {
        Commands::Eval {
            expression,
            bindings,
        } => read_bindings(bindings).and_then(|b| cli::execute_eval(&expression, b.as_deref())),
        Commands::Reduce {
            expression,
            bindings,
            sql,
        } => read_bindings(bindings)
            .and_then(|b| cli::execute_reduce(&expression, b.as_deref(), sql)),
        Commands::Print { expression, sql } => cli::execute_print(&expression, sql),
        Commands::Vars { expression, count } => cli::execute_vars(&expression, count),
        Commands::Tokens { expression } => cli::execute_tokens(&expression),
    };

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn read_bindings(bindings: Option<String>) -> Result<Option<String>, CliError> {
    match bindings {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}
