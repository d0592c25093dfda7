// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use oxc_allocator::Allocator;
use oxc_diagnostics::OxcDiagnostic;
use quiver_vm::{Agent, JsError, Script, ScriptOptions, parse_script};

/// Parses `source` into a script that lives for the rest of the program.
///
/// Functions created by a script point into its AST, and the agent keeps
/// them alive across scripts, so neither the allocator nor the script is
/// ever freed.
pub fn leak_script(
    source: &'static str,
    options: ScriptOptions,
) -> Result<&'static Script<'static>, Vec<OxcDiagnostic>> {
    let allocator: &'static Allocator = Box::leak(Box::new(Allocator::default()));
    let script = parse_script(allocator, source, options)?;
    Ok(Box::leak(Box::new(script)))
}

/// Print parse errors as graphical diagnostics.
pub fn print_parse_errors(errors: Vec<OxcDiagnostic>, source_path: &str, source: &'static str) {
    assert!(!errors.is_empty());

    // This seems to be needed for color and Unicode output. Only the first
    // installed hook takes effect.
    let _ = miette::set_hook(Box::new(|_| {
        Box::new(oxc_diagnostics::GraphicalReportHandler::new())
    }));

    eprintln!("Parse errors:");

    let named_source = miette::NamedSource::new(source_path, source);

    for error in errors {
        let report = error.with_source_code(named_source.clone());
        eprint!("{report:?}");
    }
    eprintln!();
}

/// Exit the program with parse errors.
pub fn exit_with_parse_errors(
    errors: Vec<OxcDiagnostic>,
    source_path: &str,
    source: &'static str,
) -> ! {
    print_parse_errors(errors, source_path, source);
    std::process::exit(1);
}

pub fn print_uncaught_exception(agent: &mut Agent, error: JsError) {
    eprintln!("Uncaught exception: {}", error.to_string(agent));
}

/// Exit the program after an exception nothing caught.
pub fn exit_with_uncaught_exception(agent: &mut Agent, error: JsError) -> ! {
    print_uncaught_exception(agent, error);
    std::process::exit(1);
}
