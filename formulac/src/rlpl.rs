use formula_core::{lexer::prelude::{Lexer, TokenKind}, Engine, Error};

use crate::cli::{print_error, read_line};

const PROMPT: &str = ">> ";

pub fn start(engine: &Engine) -> std::io::Result<()> {
	while let Some(input) = read_line(PROMPT)? {
		match input.as_str() {
			"" => {},
			".exit" => return Ok(()),
			_ => {
				let mut lexer = Lexer::for_source(&input, engine.registry());

				while let Some(res) = lexer.next() {
					match res {
						Ok(token) => {
							println!("{:?} {:?} at {}", token.kind, token.text, token.span);

							if token.is(TokenKind::Eof) {
								break;
							}
						},
						Err(error) => {
							print_error(&Error::Lex { src: input.clone(), error });
							break;
						}
					}
				}
			}
		}
	}

	Ok(())
}
