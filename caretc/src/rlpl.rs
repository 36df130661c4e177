use std::io::Write;

use caret_core::lexer::prelude::{tokenize, Token};

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
				for res in tokenize(input) {
					match res {
						Ok((start, token, end)) => {
							println!("{start}..{end}\t{}\t{}", token.kind(), token.as_literal());

							if token == Token::Eof {
								break;
							}
						},
						Err(err) => {
							let (message, messages) = err.details();

							println!("[at {}] Lexical error: {}", err.location.start, message);
							if !messages.is_empty() {
								println!("{}", messages.join("\n"));
							}
						}
					}
				}
			}
		}
	}
}
