//! svgsprite - command-line tool for building SVG sprites from CSS

use std::process::ExitCode;

use svgsprite::cli;

fn main() -> ExitCode {
    cli::run()
}
