use std::{io::Write, path::PathBuf};

use caret_core::{eval::prelude::Interpreter, session::execute_in};

use crate::report::{print_error, print_logs, print_priority, print_usage};

const PROMPT: &str = ">> ";
const CONTINUATION: &str = ".. ";

/// Read-eval loop over a single session. Input is buffered until every
/// `^` block is closed, so routines can span several lines.
pub fn start() -> std::io::Result<()> {
	let stdin = std::io::stdin();
	let mut interpreter = Interpreter::new();
	let mut pending = String::new();

	loop {
		let mut input = String::from("");

		print!("{}", if pending.is_empty() { PROMPT } else { CONTINUATION });
		std::io::stdout().flush()?;

		if stdin.read_line(&mut input)? == 0 {
			return Ok(());
		}

		let line = input.trim_end_matches(['\n', '\r']);

		if pending.is_empty() {
			match line.trim() {
				"" => continue,
				".exit" => return Ok(()),
				".usage" => {
					print_usage(&interpreter);
					continue;
				},
				".priority" => {
					print_priority(&interpreter);
					continue;
				},
				".logs" => {
					print_logs(&interpreter);
					continue;
				},
				_ => {}
			}
		}

		pending.push_str(line);
		pending.push('\n');

		if has_open_block(&pending) {
			continue;
		}

		let src = std::mem::take(&mut pending);

		match execute_in(&mut interpreter, PathBuf::from("repl"), &src) {
			Ok(()) => {},
			Err(err) => print_error(&err)
		}
	}
}

// an odd number of `^` leaves a block open
fn has_open_block(src: &str) -> bool {
	src.chars().filter(|c| *c == '^').count() % 2 == 1
}
