//! Command-line argument handling.
//!
//! Small enough that a hand-rolled parser beats a dependency: two flags,
//! one subcommand, and the usual help/version plumbing.

/// What the process should do, decided entirely from the arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    /// Fetch live data and render; loop unless `once` is set.
    Run { once: bool },
    /// Render canned scenarios offline; `None` renders all of them.
    Demo { scenario: Option<String> },
    ShowHelp,
    ShowVersion,
    /// An argument didn't parse; show help and exit non-zero.
    ShowHelpDueToError,
}

#[derive(Debug)]
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse the argument list, first element (program name) included.
    ///
    /// Help beats version beats errors, so `himmel demo --help` prints
    /// help instead of complaining.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|a| a.as_ref().to_string())
            .collect();

        let mut once = false;
        let mut show_help = false;
        let mut show_version = false;
        let mut bad_argument = false;
        let mut demo: Option<Option<String>> = None;

        let mut idx = 0;
        while idx < args.len() {
            match args[idx].as_str() {
                "--help" | "-h" => show_help = true,
                "--version" | "-V" => show_version = true,
                "--once" => once = true,
                "demo" if demo.is_none() => {
                    let scenario = args
                        .get(idx + 1)
                        .filter(|a| !a.starts_with('-'))
                        .cloned();
                    if scenario.is_some() {
                        idx += 1;
                    }
                    demo = Some(scenario);
                }
                other => {
                    eprintln!("Unknown argument: {}", other);
                    bad_argument = true;
                }
            }
            idx += 1;
        }

        let action = if show_help {
            CliAction::ShowHelp
        } else if show_version {
            CliAction::ShowVersion
        } else if bad_argument {
            CliAction::ShowHelpDueToError
        } else if let Some(scenario) = demo {
            CliAction::Demo { scenario }
        } else {
            CliAction::Run { once }
        };

        ParsedArgs { action }
    }
}

pub fn print_help() {
    println!("himmel {} - weather dashboard with a living sky scene", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: himmel [OPTIONS]");
    println!("       himmel demo [SCENARIO]");
    println!();
    println!("Options:");
    println!("  --once         Fetch and render once, then exit");
    println!("  -h, --help     Print this help");
    println!("  -V, --version  Print the version");
    println!();
    println!("The demo subcommand renders canned weather offline. Scenarios:");
    println!("  sunny, clear-night, rain, thunderstorm, snow, fog, dusk");
    println!("Omit the name to render all of them.");
}

pub fn print_version() {
    println!("himmel {}", env!("CARGO_PKG_VERSION"));
}
