/// Default number of tokens drawn per walk. With word pairs this is plenty
/// for a short message.
pub const DEFAULT_LENGTH: usize = 20;

/// Default character budget of a composed message.
pub const DEFAULT_BUDGET: usize = 140;

/// Strategy used to select the token a walk starts from.
///
/// # Variants
/// - `Sentinel`: start where every trained sample starts.
/// - `Custom(String)`: start from the given token, kept verbatim.
/// - `Hashtag(String)`: start from a random known token containing the
///   normalized hashtag; fails with `NoEligibleSeed` if there is none.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StartSeed {
	#[default]
	Sentinel,
	Custom(String),
	Hashtag(String),
}

/// Parameters of one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationInput {
	/// Maximum number of tokens drawn after the start.
	pub length: usize,

	/// The composed message is strictly shorter than this many characters.
	pub budget: usize,

	pub start_seed: StartSeed,
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self {
			length: DEFAULT_LENGTH,
			budget: DEFAULT_BUDGET,
			start_seed: StartSeed::Sentinel,
		}
	}
}

/// Strips `tag` from the front of `value`, ignoring ASCII case.
fn strip_tag<'a>(value: &'a str, tag: &str) -> Option<&'a str> {
	let head = value.get(..tag.len())?;
	head.eq_ignore_ascii_case(tag).then(|| &value[tag.len()..])
}

impl StartSeed {
	/// Parses the textual form used on the HTTP surface:
	/// `none`, `custom:<token>` or `hashtag:<anchor>`.
	pub fn parse(value: &str) -> Result<Self, String> {
		if value.eq_ignore_ascii_case("none") {
			return Ok(StartSeed::Sentinel);
		}
		if let Some(token) = strip_tag(value, "custom:") {
			return match token {
				"" => Err("Custom seed cannot be empty".into()),
				token => Ok(StartSeed::Custom(token.to_owned())),
			};
		}
		if let Some(anchor) = strip_tag(value, "hashtag:") {
			return match anchor {
				"" => Err("Hashtag seed cannot be empty".into()),
				anchor => Ok(StartSeed::Hashtag(anchor.to_owned())),
			};
		}
		Err("Seed must start with 'custom:' or 'hashtag:' or be 'none'".into())
	}
}
