use formula_core::{Engine, Postfix};

use crate::cli::{print_error, read_line};

const PROMPT: &str = ">> ";

pub fn start(engine: &Engine) -> std::io::Result<()> {
	while let Some(input) = read_line(PROMPT)? {
		match input.as_str() {
			"" => {},
			".exit" => return Ok(()),
			_ => {
				match engine.parse(&input) {
					Ok(node) => {
						println!("{}", node);
						println!("postfix: {}", node.postfix());
					},
					Err(err) => print_error(&err)
				}
			}
		}
	}

	Ok(())
}
