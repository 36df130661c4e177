use std::io::Write;

use caret_core::parser::prelude::parse_program;

const PROMPT: &str = ">> ";

pub fn start() -> std::io::Result<()> {
	let stdin = std::io::stdin();

	loop {
		let mut input = String::from("");

		print!("{}", PROMPT);
		std::io::stdout().flush()?;

		if stdin.read_line(&mut input)? == 0 {
			return Ok(());
		}

		let input = input.trim_end_matches(['\n', '\r']);

		match input {
			"" => {},
			".exit" => return Ok(()),
			_ => {
				match parse_program(input) {
					Ok(program) => {
						println!("{}", program);
					},
					Err(err) => {
						let (message, messages) = err.details();

						println!("[at {}] Parse error: {}.\n\t{}", err.span, message, messages.join("\n\t"))
					}
				}
			}
		}
	}
}
