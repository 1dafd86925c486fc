use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::{fs::read_to_string, process::ExitCode};

use cadl::driver::{interpret, CadlError, InterpretOptions, Session};
use cadl::interpreter::context::StdioContext;

const SYNTAX_ERROR_CODE: u8 = 65;
const RUNTIME_ERROR_CODE: u8 = 70;
const PROMPT: &str = "CADL> ";

#[derive(Debug, Parser)]
#[clap(name = "cadl", version, about = "Interpreter for the Cat Art Description Language")]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: Option<CadlCommand>,
    /// Log at debug level regardless of RUST_LOG.
    #[clap(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum CadlCommand {
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "sexpr")]
        format: ProgramFormat,
    },
    Run {
        path: PathBuf,
        /// Print the syntax tree instead of running.
        #[clap(short, long)]
        dump: bool,
        /// Fail with a diagnostic instead of printing `error: ...`.
        #[clap(short = 'e', long)]
        propagate_errors: bool,
        #[clap(long)]
        seed: Option<u64>,
        /// Annotate errors with the offending source.
        #[clap(long)]
        pretty: bool,
    },
    Repl {
        #[clap(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
    Line,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ProgramFormat {
    Debug,
    #[clap(name = "sexpr")]
    SExpr,
    Source,
}

fn main() -> ExitCode {
    cadl_main().expect("Encountered an error!")
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn cadl_main() -> Result<ExitCode> {
    color_eyre::install().expect("Can't fail at first call!");
    let args = CLArgs::parse();
    init_logging(args.verbose);
    match args.routine {
        Some(CadlCommand::Tokenize { path, format }) => {
            log::info!("Tokenizing {:?}...", path);
            let src = read_to_string(path)?;
            if !tokenize(&src, &format) {
                return Ok(ExitCode::from(SYNTAX_ERROR_CODE));
            }
        }
        Some(CadlCommand::Parse { path, format }) => {
            log::info!("Parsing {:?}...", path);
            let src = read_to_string(path)?;
            if !parse(&src, &format) {
                return Ok(ExitCode::from(SYNTAX_ERROR_CODE));
            }
        }
        Some(CadlCommand::Run {
            path,
            dump,
            propagate_errors,
            seed,
            pretty,
        }) => {
            log::info!("Running {:?}...", path);
            let src = read_to_string(&path)?;
            let options = InterpretOptions {
                dump,
                propagate_errors: propagate_errors || pretty,
                seed,
            };
            if let Err(error) = interpret(&src, &options, &mut StdioContext) {
                report_error(&src, &path, &error, pretty);
                let code = match error {
                    CadlError::Parser(_) => SYNTAX_ERROR_CODE,
                    CadlError::Runtime(_) => RUNTIME_ERROR_CODE,
                };
                return Ok(ExitCode::from(code));
            }
        }
        Some(CadlCommand::Repl { seed }) => repl(seed)?,
        None => repl(None)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn tokenize(src: &str, format: &TokenFormat) -> bool {
    use cadl::lexer::formatter::{
        BasicFormatter, DebugFormatter, LineFormatter, ToFormatter, TokenFormatter,
    };
    use cadl::lexer::{Lexer, TokenKind};

    let mut scanner = Lexer::new(src);
    let formatter: Box<dyn TokenFormatter + '_> = match format {
        TokenFormat::Debug => Box::new(ToFormatter::<DebugFormatter>::create_formatter(&scanner)),
        TokenFormat::Basic => Box::new(ToFormatter::<BasicFormatter>::create_formatter(&scanner)),
        TokenFormat::Line => Box::new(ToFormatter::<LineFormatter>::create_formatter(&scanner)),
    };
    let mut succeeded = true;
    loop {
        match scanner.next_token() {
            Ok(token) => {
                println!("{}", formatter.format(&token));
                if matches!(token.kind, TokenKind::Eof) {
                    return succeeded;
                }
            }
            Err(error) => {
                eprintln!("{}", formatter.format_lexical_error(&error));
                succeeded = false;
            }
        };
    }
}

fn parse(src: &str, format: &ProgramFormat) -> bool {
    use cadl::parser::formatter::{
        BasicParserFormatter, DebugProgramFormatter, ParserErrorFormatter, ProgramFormatter,
        SExpressionFormatter, SourceFormatter,
    };

    let formatter: Box<dyn ProgramFormatter> = match format {
        ProgramFormat::Debug => Box::new(DebugProgramFormatter),
        ProgramFormat::SExpr => Box::new(SExpressionFormatter),
        ProgramFormat::Source => Box::new(SourceFormatter),
    };
    match cadl::driver::parse(src) {
        Ok(program) => {
            println!("{}", formatter.format(&program));
            true
        }
        Err(error) => {
            eprintln!("{}", BasicParserFormatter::new(src).format_error(&error));
            false
        }
    }
}

fn report_error(src: &str, path: &Path, error: &CadlError, pretty: bool) {
    use cadl::interpreter::formatter::{BasicFormatter, PrettyFormatter, ValueFormatter};
    use cadl::parser::formatter::{
        BasicParserFormatter, ParserErrorFormatter, PrettyParserFormatter,
    };

    let path = path.to_string_lossy();
    let report = match (error, pretty) {
        (CadlError::Parser(e), true) => PrettyParserFormatter::new(src, &path).format_error(e),
        (CadlError::Parser(e), false) => BasicParserFormatter::new(src).format_error(e),
        (CadlError::Runtime(e), true) => PrettyFormatter::new(src, &path).format_error(e),
        (CadlError::Runtime(e), false) => BasicFormatter::new(src).format_error(e),
    };
    eprintln!("{report}");
}

fn repl(seed: Option<u64>) -> Result<()> {
    let mut session = Session::new(StdioContext, seed);
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        print!("{PROMPT}");
        std::io::stdout().flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let source = line.trim();
        if source.is_empty() {
            continue;
        }
        if is_exit_command(source) {
            break;
        }
        if let Err(error) = session.eval(source) {
            log::debug!("REPL input failed with {}", error.code());
            println!("error: {error}");
        }
    }
    Ok(())
}

fn is_exit_command(line: &str) -> bool {
    matches!(line.to_ascii_lowercase().as_str(), "exit" | "quit")
}

#[cfg(test)]
mod tests {
    use super::is_exit_command;

    #[test]
    fn exit_commands_ignore_case() {
        for line in ["exit", "quit", "EXIT", "Quit"] {
            assert!(is_exit_command(line), "{line} should leave the REPL");
        }
        assert!(!is_exit_command("exit;"));
        assert!(!is_exit_command("draw exit"));
    }
}
