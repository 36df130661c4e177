use std::path::PathBuf;

use utf8_chars::BufReadCharsExt;

use crate::{
    eval::prelude::Interpreter,
    parser::prelude::{parse_program, parse_program_from_stream, Program},
    utils::prelude::Error
};

pub fn read_source(path: PathBuf) -> Result<String, Error> {
    std::fs::read_to_string(&path)
        .map_err(|err| Error::StdIo { path, err: err.kind() })
}

pub fn parse_source(path: PathBuf, src: &str) -> Result<Program, Error> {
    parse_program(src)
        .map_err(|error| Error::from_parse(path, src.to_string(), error))
}

/// Reads, parses and runs the file at `path` in a fresh session.
pub fn execute(path: PathBuf) -> Result<Interpreter, Error> {
    let src = read_source(path.clone())?;

    execute_source(path, &src)
}

/// Same as [`execute`], but feeds the parser straight from the file reader.
pub fn execute_from_stream(path: PathBuf) -> Result<Interpreter, Error> {
    let file = std::fs::File::open(&path)
        .map_err(|err| Error::StdIo { path: path.clone(), err: err.kind() })?;

    let file_size = file.metadata()
        .map_err(|err| Error::StdIo { path: path.clone(), err: err.kind() })?
        .len() as usize;

    let mut src = String::with_capacity(file_size);
    let mut read_error = None;
    let mut reader = std::io::BufReader::new(file);

    let stream = reader.chars()
        .map_while(|c| match c {
            Ok(c) => {
                src.push(c);
                Some(c)
            },
            Err(err) => {
                read_error = Some(err.kind());
                None
            }
        });

    let parsed = parse_program_from_stream(stream);

    if let Some(err) = read_error {
        return Err(Error::StdIo { path, err });
    }

    // the parser stops at its first error, diagnostics still want the whole file
    let _ = std::io::Read::read_to_string(&mut reader, &mut src)
        .map_err(|err| Error::StdIo { path: path.clone(), err: err.kind() })?;

    let program = parsed
        .map_err(|error| Error::from_parse(path.clone(), src.clone(), error))?;

    let mut interpreter = Interpreter::new();
    run(&mut interpreter, path, &src, &program)?;

    Ok(interpreter)
}

/// Runs in-memory source; `path` only labels diagnostics.
pub fn execute_source(path: PathBuf, src: &str) -> Result<Interpreter, Error> {
    let mut interpreter = Interpreter::new();
    execute_in(&mut interpreter, path, src)?;

    Ok(interpreter)
}

/// Runs `src` inside an existing session.
pub fn execute_in(interpreter: &mut Interpreter, path: PathBuf, src: &str) -> Result<(), Error> {
    let program = parse_source(path.clone(), src)?;

    run(interpreter, path, src, &program)
}

fn run(interpreter: &mut Interpreter, path: PathBuf, src: &str, program: &Program) -> Result<(), Error> {
    tracing::debug!(path = %path.display(), statements = program.statements.len(), "interpreting");

    interpreter.interpret(program)
        .map_err(|error| Error::Runtime { path, src: src.to_string(), error })
}
