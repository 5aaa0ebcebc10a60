/// Separator put between two composed tokens.
pub const SEPARATOR: char = ' ';

/// Joins tokens with [`SEPARATOR`] while the result stays strictly shorter
/// than `budget` characters.
///
/// Stops at the first token that does not fit. The result may be empty,
/// e.g. when the first token alone reaches the budget.
pub fn compose<S: AsRef<str>>(tokens: &[S], budget: usize) -> String {
	let mut result = String::new();
	let mut length = 0;
	let mut included = 0;

	for token in tokens {
		let token = token.as_ref();
		let token_length = token.chars().count();
		let candidate = if included == 0 { token_length } else { length + 1 + token_length };
		if candidate >= budget {
			break;
		}
		if included > 0 {
			result.push(SEPARATOR);
		}
		result.push_str(token);
		length = candidate;
		included += 1;
	}

	result
}
