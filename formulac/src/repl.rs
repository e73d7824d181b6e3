use formula_core::{environment::prelude::parse_value, Bindings, Engine};

use crate::cli::{print_error, read_line};

const PROMPT: &str = "=> ";

const HELP: &str = "\
.set <name> <value>  bind {name} to a decimal value
.unset <name>        remove a binding
.vars                list bindings
.funcs               list functions
.exit                leave";

/// Read-eval-print loop. Bindings persist between lines.
pub fn start(engine: &Engine) -> std::io::Result<()> {
	ctrlc::set_handler(|| {
		println!();
		std::process::exit(0);
	}).map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;

	let mut bindings = Bindings::new();

	while let Some(input) = read_line(PROMPT)? {
		let input = input.trim();
		let mut words = input.split_whitespace();

		match words.next() {
			None => {},
			Some(".exit") => return Ok(()),
			Some(".help") => println!("{HELP}"),
			Some(".vars") => {
				for (name, value) in bindings.iter() {
					println!("{{{name}}} = {value}");
				}
			},
			Some(".funcs") => println!("{}", engine.registry().names().join(", ")),
			Some(".set") => match (words.next(), words.next()) {
				(Some(name), Some(value)) if parse_value(value).is_ok() => {
					let name = name.trim_start_matches('{').trim_end_matches('}');
					bindings.set(name, value);
				},
				(Some(_), Some(value)) => println!("`{value}` is not a decimal"),
				_ => println!("usage: .set <name> <value>"),
			},
			Some(".unset") => match words.next() {
				Some(name) => {
					let name = name.trim_start_matches('{').trim_end_matches('}');

					if bindings.remove(name).is_none() {
						println!("{{{name}}} is not bound");
					}
				},
				None => println!("usage: .unset <name>"),
			},
			Some(command) if command.starts_with('.') => {
				println!("unknown command `{command}`, try .help");
			},
			Some(_) => match engine.eval_str(input, &bindings) {
				Ok(value) => println!("{value}"),
				Err(err) => print_error(&err),
			}
		}
	}

	Ok(())
}
