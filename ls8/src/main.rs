use anyhow::Context;
use log::*;
use ls8_cpu::{Cpu, Ram};
use std::{
    io::{self, Write},
    process::exit,
};

mod program;
use program::{LoadError, Program};

/// The program couldn't execute an instruction.
const EXIT_RUNTIME_FAILURE: i32 = 1;
/// The program image couldn't be loaded. Nothing ran.
const EXIT_LOAD_FAILURE: i32 = 2;
const EXIT_USAGE: i32 = 64;

fn run_program(path: &str) -> anyhow::Result<()> {
    let program = Program::from_path(path)?;
    // Program::from_path already refused anything that doesn't fit
    let mut ram = Ram::with_image(program.bytes())?;
    let mut cpu = Cpu::new();
    let stdout = io::stdout();
    let mut output = stdout.lock();
    let result = cpu.run(&mut ram, &mut output);
    // whatever got printed before a crash should still come out
    output.flush().context("Could not flush program output")?;
    result?;
    debug!("Final state: {cpu:?}");
    Ok(())
}

/// Load failures and runtime failures exit differently, so callers can tell
/// "never started" apart from "crashed".
fn exit_code(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<LoadError>().is_some() {
        EXIT_LOAD_FAILURE
    } else {
        EXIT_RUNTIME_FAILURE
    }
}

fn main() {
    env_logger::init();
    let our_arguments: Vec<String> = std::env::args().collect();
    if our_arguments.len() != 2 {
        error!("Wrong number of arguments. Please provide only the path to a program image.");
        error!("Usage: ls8 path/to/program.ls8");
        exit(EXIT_USAGE);
    }
    if let Err(error) = run_program(&our_arguments[1]) {
        error!("{error:#}");
        // the log filter may be hiding the line above, and this one must
        // always reach the user
        eprintln!("ls8: {error:#}");
        exit(exit_code(&error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ls8_cpu::CpuError;

    #[test]
    fn load_and_runtime_failures_exit_differently() {
        let load = anyhow::Error::from(LoadError::Open {
            path: "x.ls8".to_owned(),
            source: io::Error::from(io::ErrorKind::NotFound),
        });
        assert_eq!(exit_code(&load), EXIT_LOAD_FAILURE);
        let too_large = anyhow::Error::from(LoadError::TooLarge {
            path: "big.ls8".to_owned(),
            source: ls8_cpu::ImageTooLarge { len: 300 },
        })
        .context("wrapped");
        assert_eq!(exit_code(&too_large), EXIT_LOAD_FAILURE);
        let runtime = anyhow::Error::from(CpuError::UnknownOpcode { opcode: 0xFF, pc: 0 });
        assert_eq!(exit_code(&runtime), EXIT_RUNTIME_FAILURE);
        assert_ne!(EXIT_LOAD_FAILURE, EXIT_RUNTIME_FAILURE);
    }
}
