use caret_core::{eval::prelude::Interpreter, utils::prelude::Error};

use crate::cli::stderr_buffer_writer;

/// Usage table sorted by descending count, ties by name.
pub fn usage_table(interpreter: &Interpreter) -> Vec<(&str, usize)> {
    let mut usage = interpreter.function_usage();
    usage.sort_by(|(a_name, a_count), (b_name, b_count)| {
        b_count.cmp(a_count).then_with(|| a_name.cmp(b_name))
    });

    usage
}

pub fn print_usage(interpreter: &Interpreter) {
    let usage = usage_table(interpreter);

    if usage.is_empty() {
        println!("Function usage: none");
        return;
    }

    let width = usage.iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or_default();

    println!("Function usage:");

    for (name, count) in usage {
        println!("    {name: <width$}  {count}");
    }
}

pub fn print_priority(interpreter: &Interpreter) {
    match interpreter.execution_priority() {
        Some(name) => println!("Execution priority: {name}"),
        None => println!("Execution priority: unset"),
    }
}

pub fn print_logs(interpreter: &Interpreter) {
    println!("Profiler logs:");

    for entry in interpreter.profiler().logs() {
        println!("    {entry}");
    }
}

pub fn print_report(interpreter: &Interpreter, logs: bool) {
    print_usage(interpreter);
    print_priority(interpreter);

    if logs {
        print_logs(interpreter);
    }
}

pub fn print_error(err: &Error) {
    let buf_writer = stderr_buffer_writer();
    let mut buf = buf_writer.buffer();

    if err.pretty(&mut buf).is_ok() {
        let _ = buf_writer.print(&buf);
    } else {
        eprintln!("{err}");
    }
}
