use std::process::ExitCode;

use lox_driver::{Argument, Parser};

fn main() -> ExitCode {
    let argument = Argument::parse();
    lox_driver::run(&argument)
}
